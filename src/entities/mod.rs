pub mod customer;
pub mod order;
pub mod order_entry;
pub mod paper;
pub mod paper_property;
pub mod property;
