pub mod claude;
pub mod prompt;

use async_trait::async_trait;

use crate::error::Result;
use crate::listing::{EnhancementRequest, EnhancementResult};

/// External service that rewrites a listing description and suggests tags.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// Produce an enhanced description and tags for the given draft fields.
    ///
    /// Any error means the call failed; callers do not inspect its shape.
    async fn enhance(&self, request: &EnhancementRequest) -> Result<EnhancementResult>;
}
