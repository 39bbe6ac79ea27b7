//! Domain types: bars, events, identifiers, positions.

mod bar;
mod event;
mod ids;
mod position;

pub use bar::Bar;
pub use event::{
    Event, FillEvent, MarketEvent, OrderDirection, OrderEvent, OrderKind, SignalDirection,
    SignalEvent,
};
pub use ids::{FillId, IdGenerator, OrderId};
pub use position::Position;
