pub(crate) mod rotate;
pub(crate) mod transform;
