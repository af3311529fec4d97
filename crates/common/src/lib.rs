pub mod ids;
pub mod money;

pub use ids::{OrderId, OwnerId, ProductId};
pub use money::Money;
