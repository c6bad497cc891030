//! Smart-device model shared by the factory modules.
//!
//! Products are generic over a vendor marker so each vendor gets its own
//! concrete type (`VendorLight<MeHome>` is not a `VendorLight<RedMe>`)
//! without duplicating the device logic.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Kind of smart device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Light,
    AirConditioner,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::AirConditioner => f.write_str("air conditioner"),
        }
    }
}

/// Static description of a device, supplied to factories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: u32,
    pub name: String,
    pub kind: DeviceKind,
    pub vendor: String,
    pub model: String,
}

impl DeviceInfo {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        kind: DeviceKind,
        vendor: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            vendor: vendor.into(),
            model: model.into(),
        }
    }

    /// Shorthand for a light description.
    pub fn light(id: u32, name: impl Into<String>, vendor: impl Into<String>) -> Self {
        Self::new(id, name, DeviceKind::Light, vendor, "L1")
    }

    /// Shorthand for an air conditioner description.
    pub fn air_conditioner(id: u32, name: impl Into<String>, vendor: impl Into<String>) -> Self {
        Self::new(id, name, DeviceKind::AirConditioner, vendor, "AC1")
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} {} ({}/{})",
            self.kind, self.id, self.name, self.vendor, self.model
        )
    }
}

// ---------------------------------------------------------------------------
// Product traits
// ---------------------------------------------------------------------------

/// Operations every smart device supports.
pub trait SmartDevice: Send + Sync {
    fn info(&self) -> &DeviceInfo;

    fn open(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()>;

    fn is_open(&self) -> bool;

    fn id(&self) -> u32 {
        self.info().id
    }

    fn name(&self) -> &str {
        &self.info().name
    }

    /// Name of the vendor that built this device.
    fn vendor(&self) -> &'static str;
}

/// A light with a selectable lighting mode.
pub trait Light: SmartDevice {
    fn mode(&self) -> u8;

    fn set_mode(&mut self, mode: u8) -> Result<()>;
}

/// An air conditioner with a target temperature in degrees Celsius.
pub trait AirConditioner: SmartDevice {
    fn temperature(&self) -> f64;

    fn set_temperature(&mut self, celsius: f64) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

/// Marker trait naming a device vendor.
pub trait Vendor: Send + Sync + 'static {
    const NAME: &'static str;
}

/// The MeHome vendor.
#[derive(Debug)]
pub struct MeHome;

impl Vendor for MeHome {
    const NAME: &'static str = "MeHome";
}

/// The RedMe vendor.
#[derive(Debug)]
pub struct RedMe;

impl Vendor for RedMe {
    const NAME: &'static str = "RedMe";
}

/// A vendor's light.
#[derive(Debug)]
pub struct VendorLight<V> {
    info: DeviceInfo,
    mode: u8,
    open: bool,
    _vendor: PhantomData<V>,
}

impl<V: Vendor> VendorLight<V> {
    pub fn new(info: DeviceInfo) -> Self {
        Self {
            info,
            mode: 0,
            open: false,
            _vendor: PhantomData,
        }
    }
}

impl<V: Vendor> SmartDevice for VendorLight<V> {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn open(&mut self) -> Result<()> {
        debug!(vendor = V::NAME, device = %self.info, "light open");
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        debug!(vendor = V::NAME, device = %self.info, "light close");
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn vendor(&self) -> &'static str {
        V::NAME
    }
}

impl<V: Vendor> Light for VendorLight<V> {
    fn mode(&self) -> u8 {
        self.mode
    }

    fn set_mode(&mut self, mode: u8) -> Result<()> {
        debug!(vendor = V::NAME, id = self.info.id, mode, "light set mode");
        self.mode = mode;
        Ok(())
    }
}

/// A vendor's air conditioner.
#[derive(Debug)]
pub struct VendorAirConditioner<V> {
    info: DeviceInfo,
    temperature: f64,
    open: bool,
    _vendor: PhantomData<V>,
}

impl<V: Vendor> VendorAirConditioner<V> {
    pub fn new(info: DeviceInfo) -> Self {
        Self {
            info,
            temperature: 0.0,
            open: false,
            _vendor: PhantomData,
        }
    }
}

impl<V: Vendor> SmartDevice for VendorAirConditioner<V> {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn open(&mut self) -> Result<()> {
        debug!(vendor = V::NAME, device = %self.info, "air conditioner open");
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        debug!(vendor = V::NAME, device = %self.info, "air conditioner close");
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn vendor(&self) -> &'static str {
        V::NAME
    }
}

impl<V: Vendor> AirConditioner for VendorAirConditioner<V> {
    fn temperature(&self) -> f64 {
        self.temperature
    }

    fn set_temperature(&mut self, celsius: f64) -> Result<()> {
        debug!(vendor = V::NAME, id = self.info.id, celsius, "air conditioner set temperature");
        self.temperature = celsius;
        Ok(())
    }
}

pub type MeHomeLight = VendorLight<MeHome>;
pub type RedMeLight = VendorLight<RedMe>;
pub type MeHomeAirConditioner = VendorAirConditioner<MeHome>;
pub type RedMeAirConditioner = VendorAirConditioner<RedMe>;
