//! Domain model: carts, credit, orders, returns and the signed-in session.
pub mod aggregates;
pub mod events;
pub mod value_objects;
