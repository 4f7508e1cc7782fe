//! Device catalog: interface → vendor → model → action.
//!
//! The catalog is static metadata used to pick the protocol and encoding
//! rule for a device before anything is encoded or sent. Every level has a
//! machine `name` (used in lookups) and a human `clear_name` (used for
//! display).
//!
//! Models are defined as factory functions (e.g. [`ab440sc()`]) that return
//! a fully populated [`ModelDef`]. The built-in catalog covers:
//!
//! | Interface | Vendor        | Model     | Protocol | Family           |
//! |-----------|---------------|-----------|----------|------------------|
//! | 433       | `elro`        | `ab440sc` | 1        | `ElroPollin`     |
//! | 433       | `intertechno` | `itr1500` | 1        | `Intertechno`    |
//! | 433       | `intertechno` | `par1000` | 1        | `IntertechnoPar` |
//! | 433       | `dario`       | `generic` | 1        | `Dario`          |
//!
//! Lookups accept the selector [`ALL`] where a listing is requested. It is
//! rejected wherever a single device is needed to proceed.

use kraken_core::error::{Error, Result};
use kraken_core::types::{Protocol, VendorFamily};

/// Wildcard selector for listings.
pub const ALL: &str = "all";

/// An action a model accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDef {
    pub name: &'static str,
    pub clear_name: &'static str,
}

/// Static definition of one switch model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDef {
    /// Lookup name (e.g. `"ab440sc"`).
    pub name: &'static str,
    /// Display name (e.g. `"AB 440SC"`).
    pub clear_name: &'static str,
    /// Timing scheme the receiver expects.
    pub protocol: Protocol,
    /// Encoding rule for the codeword.
    pub family: VendorFamily,
    /// Actions the model accepts.
    pub actions: Vec<ActionDef>,
}

/// A vendor and its models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorDef {
    pub name: &'static str,
    pub clear_name: &'static str,
    pub models: Vec<ModelDef>,
}

/// A radio interface and the vendors reachable through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDef {
    pub name: &'static str,
    pub vendors: Vec<VendorDef>,
}

/// Everything needed to encode and send for one catalog model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDevice {
    pub interface: String,
    pub vendor: String,
    pub model: String,
    pub protocol: Protocol,
    pub family: VendorFamily,
}

fn set_status() -> ActionDef {
    ActionDef {
        name: "set_status",
        clear_name: "Status setzen",
    }
}

/// Elro AB 440SC socket set.
pub fn ab440sc() -> ModelDef {
    ModelDef {
        name: "ab440sc",
        clear_name: "AB 440SC",
        protocol: Protocol::ONE,
        family: VendorFamily::ElroPollin,
        actions: vec![set_status()],
    }
}

/// Intertechno ITR-1500 remote (letter/number addressing).
pub fn itr1500() -> ModelDef {
    ModelDef {
        name: "itr1500",
        clear_name: "ITR 1500",
        protocol: Protocol::ONE,
        family: VendorFamily::Intertechno,
        actions: vec![set_status()],
    }
}

/// Intertechno PAR-1000 sockets.
pub fn par1000() -> ModelDef {
    ModelDef {
        name: "par1000",
        clear_name: "PAR 1000",
        protocol: Protocol::ONE,
        family: VendorFamily::IntertechnoPar,
        actions: vec![set_status()],
    }
}

/// Dario sockets with 6-bit system and unit codes.
pub fn dario_generic() -> ModelDef {
    ModelDef {
        name: "generic",
        clear_name: "Generic",
        protocol: Protocol::ONE,
        family: VendorFamily::Dario,
        actions: vec![set_status()],
    }
}

fn interface_433() -> InterfaceDef {
    InterfaceDef {
        name: "433",
        vendors: vec![
            VendorDef {
                name: "elro",
                clear_name: "Elro",
                models: vec![ab440sc()],
            },
            VendorDef {
                name: "intertechno",
                clear_name: "Intertechno",
                models: vec![itr1500(), par1000()],
            },
            VendorDef {
                name: "dario",
                clear_name: "Dario",
                models: vec![dario_generic()],
            },
        ],
    }
}

/// A lookup tree of interfaces, vendors, models and actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    interfaces: Vec<InterfaceDef>,
}

impl Catalog {
    /// A catalog over the given interfaces.
    pub fn new(interfaces: Vec<InterfaceDef>) -> Self {
        Catalog { interfaces }
    }

    /// The catalog of every device kraken knows how to drive.
    pub fn builtin() -> Self {
        Catalog::new(vec![interface_433()])
    }

    /// All interfaces.
    pub fn interfaces(&self) -> &[InterfaceDef] {
        &self.interfaces
    }

    /// One interface by name.
    pub fn interface(&self, name: &str) -> Result<&InterfaceDef> {
        self.interfaces
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| Error::NotFound(format!("interface '{name}'")))
    }

    /// All vendors of `interface` when `selector` is [`ALL`], else the named
    /// vendor.
    pub fn vendors(&self, interface: &str, selector: &str) -> Result<Vec<&VendorDef>> {
        let iface = self.interface(interface)?;
        if selector == ALL {
            return Ok(iface.vendors.iter().collect());
        }
        Ok(vec![Self::vendor(iface, selector)?])
    }

    /// All models of one vendor when `selector` is [`ALL`], else the named
    /// model. `vendor` must name a single vendor.
    pub fn models(&self, interface: &str, vendor: &str, selector: &str) -> Result<Vec<&ModelDef>> {
        let iface = self.interface(interface)?;
        if vendor == ALL {
            return Err(Error::NotFound(
                "cannot deliver models for all vendors".into(),
            ));
        }
        let vendor = Self::vendor(iface, vendor)?;
        if selector == ALL {
            return Ok(vendor.models.iter().collect());
        }
        Ok(vec![Self::model(vendor, selector)?])
    }

    /// Resolve a single model to its protocol and encoding rule.
    ///
    /// The wildcard is rejected at every level.
    pub fn resolve(&self, interface: &str, vendor: &str, model: &str) -> Result<ResolvedDevice> {
        for (what, value) in [("interface", interface), ("vendor", vendor), ("model", model)] {
            if value == ALL {
                return Err(Error::NotFound(format!(
                    "a single {what} is required, got '{ALL}'"
                )));
            }
        }
        let iface = self.interface(interface)?;
        let vendor_def = Self::vendor(iface, vendor)?;
        let model_def = Self::model(vendor_def, model)?;
        Ok(ResolvedDevice {
            interface: iface.name.to_string(),
            vendor: vendor_def.name.to_string(),
            model: model_def.name.to_string(),
            protocol: model_def.protocol,
            family: model_def.family,
        })
    }

    /// Every model in the catalog, flattened.
    pub fn devices(&self) -> Vec<ResolvedDevice> {
        let mut out = Vec::new();
        for iface in &self.interfaces {
            for vendor in &iface.vendors {
                for model in &vendor.models {
                    out.push(ResolvedDevice {
                        interface: iface.name.to_string(),
                        vendor: vendor.name.to_string(),
                        model: model.name.to_string(),
                        protocol: model.protocol,
                        family: model.family,
                    });
                }
            }
        }
        out
    }

    fn vendor<'a>(iface: &'a InterfaceDef, name: &str) -> Result<&'a VendorDef> {
        iface.vendors.iter().find(|v| v.name == name).ok_or_else(|| {
            Error::NotFound(format!("vendor '{name}' on interface '{}'", iface.name))
        })
    }

    fn model<'a>(vendor: &'a VendorDef, name: &str) -> Result<&'a ModelDef> {
        vendor
            .models
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| Error::NotFound(format!("model '{name}' of vendor '{}'", vendor.name)))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::builtin()
    }
}
