/*!
 * Properties Module
 * Interned property sets, their store and the default context
 */

pub mod context;
pub mod set;
pub mod store;

pub use context::DefaultContext;
pub use set::{Property, PropertySet, PropertySetDependency};
pub use store::{Context, PropertySetStore};
