//! Creational patterns of the catalogue.
//!
//! Every factory, registry and container here is an explicit value owned by
//! the caller. Nothing is registered globally.
//!
//! # Modules
//!
//! - [`error`]: Error types for creational operations
//! - [`device`]: Smart-device model shared by the factories
//! - [`registry`]: [`VendorRegistry`]: vendor name to factory
//! - [`abstract_factory`]: Families of devices per vendor
//! - [`factory_method`]: One light factory per vendor
//! - [`simple_factory`]: One factory choosing the vendor by name
//! - [`builder`]: [`SqlQueryBuilder`]
//! - [`prototype`]: [`UserFactory`] cloning a configured prototype
//! - [`singleton`]: Lazy singletons and the [`BeanContainer`]

pub mod abstract_factory;
pub mod builder;
pub mod device;
pub mod error;
pub mod factory_method;
pub mod prototype;
pub mod registry;
pub mod simple_factory;
pub mod singleton;

pub use abstract_factory::{MeHomeFactory, RedMeFactory, SmartFactory};
pub use builder::{SqlQuery, SqlQueryBuilder};
pub use device::{
    AirConditioner, DeviceInfo, DeviceKind, Light, MeHome, RedMe, SmartDevice, Vendor,
    VendorAirConditioner, VendorLight,
};
pub use error::{CreationalError, Result};
pub use factory_method::{LightFactory, MeHomeLightFactory, RedMeLightFactory};
pub use prototype::{UserFactory, UserInfo};
pub use registry::VendorRegistry;
pub use simple_factory::SimpleLightFactory;
pub use singleton::{BeanContainer, ContainedGreeter, EagerGreeter, Greeter, LazyGreeter, LazySingleton};
