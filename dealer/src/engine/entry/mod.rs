pub mod bar;
pub mod order;

pub use bar::Bar;
pub use order::{Order, OrderId, OrderSide, OrderState, OrderType};
