//! Abstract factory: one factory per vendor builds a whole family of
//! devices (lights and air conditioners) that belong together.

use tracing::debug;

use crate::device::{
    AirConditioner, DeviceInfo, DeviceKind, Light, MeHomeAirConditioner, MeHomeLight,
    RedMeAirConditioner, RedMeLight,
};
use crate::error::{CreationalError, Result};

/// Builds every product of one vendor's family.
pub trait SmartFactory: Send + Sync {
    fn vendor(&self) -> &'static str;

    fn create_light(&self, info: &DeviceInfo) -> Result<Box<dyn Light>>;

    fn create_air_conditioner(&self, info: &DeviceInfo) -> Result<Box<dyn AirConditioner>>;
}

fn expect_kind(info: &DeviceInfo, expected: DeviceKind) -> Result<()> {
    if info.kind != expected {
        return Err(CreationalError::DeviceKindMismatch {
            id: info.id,
            expected,
            actual: info.kind,
        });
    }
    Ok(())
}

/// Factory for the MeHome family.
#[derive(Debug, Default)]
pub struct MeHomeFactory;

impl SmartFactory for MeHomeFactory {
    fn vendor(&self) -> &'static str {
        "MeHome"
    }

    fn create_light(&self, info: &DeviceInfo) -> Result<Box<dyn Light>> {
        expect_kind(info, DeviceKind::Light)?;
        debug!(vendor = self.vendor(), id = info.id, "create light");
        Ok(Box::new(MeHomeLight::new(info.clone())))
    }

    fn create_air_conditioner(&self, info: &DeviceInfo) -> Result<Box<dyn AirConditioner>> {
        expect_kind(info, DeviceKind::AirConditioner)?;
        debug!(vendor = self.vendor(), id = info.id, "create air conditioner");
        Ok(Box::new(MeHomeAirConditioner::new(info.clone())))
    }
}

/// Factory for the RedMe family.
#[derive(Debug, Default)]
pub struct RedMeFactory;

impl SmartFactory for RedMeFactory {
    fn vendor(&self) -> &'static str {
        "RedMe"
    }

    fn create_light(&self, info: &DeviceInfo) -> Result<Box<dyn Light>> {
        expect_kind(info, DeviceKind::Light)?;
        debug!(vendor = self.vendor(), id = info.id, "create light");
        Ok(Box::new(RedMeLight::new(info.clone())))
    }

    fn create_air_conditioner(&self, info: &DeviceInfo) -> Result<Box<dyn AirConditioner>> {
        expect_kind(info, DeviceKind::AirConditioner)?;
        debug!(vendor = self.vendor(), id = info.id, "create air conditioner");
        Ok(Box::new(RedMeAirConditioner::new(info.clone())))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::VendorRegistry;

    fn registry() -> VendorRegistry<dyn SmartFactory> {
        let registry: VendorRegistry<dyn SmartFactory> = VendorRegistry::new();
        registry.register("MeHome", Arc::new(MeHomeFactory)).unwrap();
        registry.register("RedMe", Arc::new(RedMeFactory)).unwrap();
        registry
    }

    #[test]
    fn family_comes_from_one_vendor() {
        let registry = registry();
        let info_light = DeviceInfo::light(1, "desk", "MeHome");
        let info_ac = DeviceInfo::air_conditioner(2, "living room", "MeHome");

        let factory = registry.get(&info_light.vendor).unwrap();
        let mut light = factory.create_light(&info_light).unwrap();
        let mut ac = factory.create_air_conditioner(&info_ac).unwrap();

        light.open().unwrap();
        light.set_mode(2).unwrap();
        ac.open().unwrap();
        ac.set_temperature(26.0).unwrap();

        assert_eq!(light.vendor(), "MeHome");
        assert_eq!(ac.vendor(), "MeHome");
        assert_eq!(light.mode(), 2);
        assert_eq!(ac.temperature(), 26.0);
    }

    #[test]
    fn vendors_build_their_own_products() {
        let registry = registry();
        let light = registry
            .get("RedMe")
            .unwrap()
            .create_light(&DeviceInfo::light(3, "porch", "RedMe"))
            .unwrap();
        assert_eq!(light.vendor(), "RedMe");
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let err = MeHomeFactory
            .create_air_conditioner(&DeviceInfo::light(4, "lamp", "MeHome"))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CreationalError::DeviceKindMismatch {
                id: 4,
                expected: DeviceKind::AirConditioner,
                actual: DeviceKind::Light,
            }
        ));
    }
}
