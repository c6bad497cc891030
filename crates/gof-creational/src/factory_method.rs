//! Factory method: each vendor supplies its own [`LightFactory`]; callers
//! pick the factory through a [`VendorRegistry`](crate::registry::VendorRegistry)
//! and never name a concrete light type.

use tracing::debug;

use crate::device::{DeviceInfo, Light, MeHomeLight, RedMeLight};
use crate::error::Result;

/// Creates a light from its description.
pub trait LightFactory: Send + Sync {
    fn create(&self, info: &DeviceInfo) -> Result<Box<dyn Light>>;
}

#[derive(Debug, Default)]
pub struct MeHomeLightFactory;

impl LightFactory for MeHomeLightFactory {
    fn create(&self, info: &DeviceInfo) -> Result<Box<dyn Light>> {
        debug!(id = info.id, "MeHome light factory");
        Ok(Box::new(MeHomeLight::new(info.clone())))
    }
}

#[derive(Debug, Default)]
pub struct RedMeLightFactory;

impl LightFactory for RedMeLightFactory {
    fn create(&self, info: &DeviceInfo) -> Result<Box<dyn Light>> {
        debug!(id = info.id, "RedMe light factory");
        Ok(Box::new(RedMeLight::new(info.clone())))
    }
}
