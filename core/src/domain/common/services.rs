use crate::domain::food_recognition::ports::VisionClient;

/// Holds the outbound adapters the domain services run against.
#[derive(Clone)]
pub struct Service<V>
where
    V: VisionClient,
{
    pub(crate) vision_client: V,
}

impl<V> Service<V>
where
    V: VisionClient,
{
    pub fn new(vision_client: V) -> Self {
        Self { vision_client }
    }
}
