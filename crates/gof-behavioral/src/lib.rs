//! Behavioral patterns of the catalogue.
//!
//! # Modules
//!
//! - [`error`]: Error types for behavioral operations
//! - [`chain`]: Log lines passed along a chain of level filters
//! - [`command`]: Undoable drawing commands on a canvas
//! - [`iterator`]: A FIFO linked list with a borrowing iterator
//! - [`mediator`]: Phone app and smart lights talking through a cloud hub
//! - [`delegate`]: Messages dispatched to handlers by class
//! - [`memento`]: Editor snapshots with undo and redo
//! - [`observer`]: Alarm clocks driven by an accelerated time service
//! - [`policy`]: Interchangeable sort policies
//! - [`template_method`]: A fixed query skeleton with per-DAO row hooks
//! - [`visitor`]: Sales reports computed by visiting orders

pub mod chain;
pub mod command;
pub mod delegate;
pub mod error;
pub mod iterator;
pub mod mediator;
pub mod memento;
pub mod observer;
pub mod policy;
pub mod template_method;
pub mod visitor;

pub use chain::{ChainLogger, LevelFilter, LineWriter, LogLevel, MemoryFileWriter};
pub use command::{Canvas, ColorCmd, DotCmd, DrawCommand, DrawOp, Graphics, LineCmd, RecordingGraphics};
pub use delegate::{DispatchDelegate, EchoHandler, Message, MessageHandler, TimeHandler};
pub use error::{BehavioralError, Result};
pub use iterator::{Iter, LinkedList};
pub use mediator::{CloudMediator, PhoneApp, SmartDevice, SmartLight};
pub use memento::{Editor, EditorMemento};
pub use observer::{AlarmClock, ObserverAction, TickerHandle, TimeObserver, TimeService, TimeServiceConfig};
pub use policy::{policy_by_name, BubbleSort, SelectionSort, SortPolicy};
pub use template_method::{
    BaseDao, MockUserTable, Row, RowMapper, RowSource, UserDao, UserInfo, UserMapper, Value,
};
pub use visitor::{CityVisitor, ProductVisitor, SaleOrder, SaleOrderService, SaleOrderVisitor};
