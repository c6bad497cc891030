//! Simple factory: a single factory decides which concrete light to build
//! from the vendor named in the description.

use tracing::debug;

use crate::device::{DeviceInfo, Light, MeHomeLight, RedMeLight};
use crate::error::{CreationalError, Result};
use crate::factory_method::LightFactory;

/// Builds MeHome and RedMe lights, chosen by case-insensitive vendor name.
#[derive(Debug, Default)]
pub struct SimpleLightFactory;

impl SimpleLightFactory {
    pub fn new() -> Self {
        Self
    }
}

impl LightFactory for SimpleLightFactory {
    fn create(&self, info: &DeviceInfo) -> Result<Box<dyn Light>> {
        debug!(id = info.id, vendor = %info.vendor, "simple light factory");
        match info.vendor.to_lowercase().as_str() {
            "mehome" => Ok(Box::new(MeHomeLight::new(info.clone()))),
            "redme" => Ok(Box::new(RedMeLight::new(info.clone()))),
            _ => Err(CreationalError::UnsupportedVendor {
                vendor: info.vendor.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_match_ignores_case() {
        let factory = SimpleLightFactory::new();
        let light = factory.create(&DeviceInfo::light(1, "a", "MEHOME")).unwrap();
        assert_eq!(light.vendor(), "MeHome");
        let light = factory.create(&DeviceInfo::light(2, "b", "redme")).unwrap();
        assert_eq!(light.vendor(), "RedMe");
    }

    #[test]
    fn unsupported_vendor() {
        let err = SimpleLightFactory::new()
            .create(&DeviceInfo::light(3, "c", "Acme"))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "unsupported vendor: Acme");
    }
}
