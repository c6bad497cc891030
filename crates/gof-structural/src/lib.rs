//! Structural patterns of the catalogue.
//!
//! # Modules
//!
//! - [`error`]: Error types for structural operations
//! - [`adapter`]: Fahrenheit vendor thermometers behind a Celsius interface
//! - [`bridge`]: Data fetchers and exporters varying independently
//! - [`composite`]: Courses made of courses
//! - [`decorator`]: JSON formatting layered over a console logger
//! - [`facade`]: One call for a multi-service gift exchange
//! - [`flyweight`]: Shared ticket records
//! - [`proxy`]: Logging and permission proxies around an order service

pub mod adapter;
pub mod bridge;
pub mod composite;
pub mod decorator;
pub mod error;
pub mod facade;
pub mod flyweight;
pub mod proxy;

pub use adapter::{
    MockSpecialThermometer, SpecialThermometer, SpecialThermometerAdapter, SpecialThermometerFactory, Thermometer,
    ThermometerFactory,
};
pub use bridge::{
    CsvExporter, DataExporter, DataFetcher, DataField, DataRow, DbConfig, FieldValue, JsonExporter, MysqlFetcher,
    OracleFetcher,
};
pub use composite::{CompositeCourse, Course, Learner, LearningState, SimpleCourse};
pub use decorator::{
    ConsoleLogger, ConsoleLoggerFactory, JsonLogger, JsonLoggerFactory, Level, Logger, LoggerFactory,
};
pub use error::{Result, StructuralError};
pub use facade::{
    GiftExchangeRequest, GiftExchangeService, GiftInfo, InMemoryInventoryService, InMemoryPointsService,
    InMemoryShippingService, InventoryService, PointsService, ShippingOrder, ShippingService,
};
pub use flyweight::{RemainingTicketService, Ticket, TicketPool, TicketRemaining};
pub use proxy::{InMemoryOrderService, LoggingOrderService, Order, OrderService, SecureOrderService, User};
