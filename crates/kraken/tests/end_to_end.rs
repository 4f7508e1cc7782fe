//! End-to-end behaviour through the facade: catalog lookup, encoding and
//! transmission on a mock line.

use std::sync::Arc;

use kraken::rf433::{
    encode, Catalog, Rf433Switch, TransmitOptions, Transmitter, TransmitterBuilder,
};
use kraken::{Codeword, Error, LineLevel, Protocol, RemoteSwitch, Status, TriState, VendorFamily};
use kraken_test_harness::{InstantTimer, MockLine};
use tokio_util::sync::CancellationToken;

#[test]
fn elro_scenario() {
    let device = Catalog::builtin().resolve("433", "elro", "ab440sc").unwrap();
    assert_eq!(device.protocol, Protocol::ONE);

    let cw = encode(device.family, "10000", "11110", Status::On).unwrap();
    use TriState::{Float as F, Zero as Z};
    assert_eq!(cw.symbols(), &[Z, F, F, F, F, Z, Z, Z, Z, F, Z, F]);
    assert_eq!(cw.to_string(), "0FFFF0000F0F");
}

#[test]
fn elro_address_follows_dip_bits() {
    for m in 0..32u32 {
        for s in [0u32, 9, 31] {
            let master = format!("{m:05b}");
            let slave = format!("{s:05b}");
            let cw = encode(VendorFamily::ElroPollin, &master, &slave, Status::Off).unwrap();
            let expected: String = master
                .chars()
                .chain(slave.chars())
                .map(|b| if b == '1' { '0' } else { 'F' })
                .chain("F0".chars())
                .collect();
            assert_eq!(cw.to_string(), expected);
        }
    }
}

#[test]
fn intertechno_grid_is_distinct_and_bounded() {
    let mut seen = std::collections::HashSet::new();
    for letter in 'A'..='P' {
        for unit in 1..=16 {
            let cw = encode(
                VendorFamily::Intertechno,
                &letter.to_string(),
                &unit.to_string(),
                Status::On,
            )
            .unwrap();
            assert_eq!(cw.len(), 12);
            assert!(cw.to_string().ends_with("0FFF"));
            assert!(seen.insert(cw));
        }
    }
    assert_eq!(seen.len(), 256);

    for (master, slave) in [("Q", "1"), ("A", "0"), ("A", "17"), ("AB", "1")] {
        assert!(matches!(
            encode(VendorFamily::Intertechno, master, slave, Status::On),
            Err(Error::UnsupportedAddress(_))
        ));
    }
}

#[test]
fn encoding_is_idempotent() {
    let a = kraken::encode_command(1, "dario", "110101", "000011", "off").unwrap();
    let b = kraken::encode_command(1, "dario", "110101", "000011", "off").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.codeword.len(), 21);
}

#[test]
fn encode_command_error_taxonomy() {
    assert!(matches!(
        kraken::encode_command(4, "elro", "10000", "10000", "on"),
        Err(Error::UnsupportedProtocol(4))
    ));
    assert!(matches!(
        kraken::encode_command(1, "brennenstuhl", "10000", "10000", "on"),
        Err(Error::UnsupportedVendor(_))
    ));
    assert!(matches!(
        kraken::encode_command(1, "elro", "10000", "10000", "toggle"),
        Err(Error::InvalidParameter(_))
    ));
    assert!(matches!(
        kraken::encode_command(1, "par", "E", "1", "on"),
        Err(Error::UnsupportedAddress(_))
    ));
}

#[test]
fn text_form_round_trips() {
    for text in ["0FFFF0FFFF0F", "1FFF1FFFFFFF", "000000000FFF", "01F"] {
        let cw: Codeword = text.parse().unwrap();
        assert_eq!(cw.to_string(), text);
    }
}

#[tokio::test]
async fn transmit_covers_every_segment() {
    let line = MockLine::new();
    let log = line.log();
    let timer = InstantTimer::new();
    let transmitter = TransmitterBuilder::new(Protocol::ONE)
        .repeat_count(10)
        .build_with_line(line, timer.clone())
        .unwrap();

    let cw: Codeword = "0FFFF0000F0F".parse().unwrap();
    let report = transmitter.transmit(&cw).await.unwrap();

    assert_eq!(report.segments, 10 * 13);
    assert_eq!(report.writes, 10 * (4 * 12 + 2));
    assert_eq!(log.write_count() as u64, report.writes);
    // Every write is followed by exactly one wait.
    assert_eq!(timer.offsets().len() as u64, report.writes);
}

#[tokio::test]
async fn frames_never_overlap() {
    let timer = InstantTimer::new();
    let transmitter = TransmitterBuilder::new(Protocol::ONE)
        .repeat_count(3)
        .build_with_line(MockLine::new(), timer.clone())
        .unwrap();

    let cw: Codeword = "F0".parse().unwrap();
    transmitter.transmit(&cw).await.unwrap();

    // Within a frame offsets strictly increase; each frame ends on the full
    // frame length before the next one restarts from its own origin.
    let frame_end = Protocol::ONE.pulse_length() * (2 * 8 + 32);
    let offsets = timer.offsets();
    for frame in offsets.chunks(10) {
        assert!(frame.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(frame.last(), Some(&frame_end));
    }
}

#[tokio::test]
async fn operator_cancel_mid_repeat() {
    let token = CancellationToken::new();
    // 3 full frames of a 12-symbol codeword, then one more mark.
    let cancel_at = 3 * 50 + 1;
    let line = MockLine::new().cancel_after(cancel_at, token.clone());
    let log = line.log();
    let transmitter = TransmitterBuilder::new(Protocol::ONE)
        .build_with_line(line, InstantTimer::new())
        .unwrap();

    let cw: Codeword = "0FFFF0000F0F".parse().unwrap();
    let result = transmitter
        .transmit_with(&cw, TransmitOptions::new().with_cancel(token))
        .await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(log.write_count(), cancel_at + 1);
    assert_eq!(log.last_level(), Some(LineLevel::Low));

    // The transmitter is still usable afterwards.
    let report = transmitter
        .transmit_with(&cw, TransmitOptions::new().with_repeat_count(1))
        .await
        .unwrap();
    assert_eq!(report.frames, 1);
}

#[tokio::test]
async fn switch_over_shared_transmitter() {
    let line = MockLine::new();
    let log = line.log();
    let transmitter: Arc<Transmitter> = Arc::new(
        TransmitterBuilder::new(Protocol::ONE)
            .repeat_count(1)
            .build_with_line(line, InstantTimer::new())
            .unwrap(),
    );
    let catalog = Catalog::builtin();
    let par = catalog.resolve("433", "intertechno", "par1000").unwrap();
    let switch = Rf433Switch::from_device(&par, "B", "2", transmitter.clone()).unwrap();

    let switch: &dyn RemoteSwitch = &switch;
    switch.turn_on().await.unwrap();
    switch.set_status(Status::Off).await.unwrap();
    assert_eq!(log.write_count(), 2 * 50);

    let released = transmitter.shutdown().await.unwrap();
    assert!(!released.is_active());
    assert_eq!(log.releases(), 1);
    assert!(matches!(switch.turn_on().await, Err(Error::NotConnected)));
}
