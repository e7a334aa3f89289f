//! # Repository Layer
//!
//! One repository per aggregate. Plain reads are `&self` methods going
//! through the pool; writes that belong to a ledger operation are
//! associated functions taking `&mut SqliteConnection`, so the service
//! layer decides where the transaction begins and ends.

pub mod credit;
pub mod movement;
pub mod product;
pub mod supplier;

pub use credit::CreditRepository;
pub use movement::MovementRepository;
pub use product::ProductRepository;
pub use supplier::SupplierRepository;
