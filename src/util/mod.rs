pub(crate) use registration::{OwnedRegistration, Registration};
pub(crate) use task_pool::TaskPool;

mod registration;
mod task_pool;
