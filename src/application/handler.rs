//! # Handlers & Middleware
//!
//! The two callback shapes the router invokes. Both are implemented for plain
//! async closures, so `|ctx| async move { ... }` works wherever one is expected.

use crate::application::context::Context;
use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;

/// Code bound to a command (or to a direct mention of the bot).
///
/// Errors are logged by the router and go no further.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: Context) -> Result<()>;
}

#[async_trait]
impl<F, Fut> Handler for F
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn handle(&self, ctx: Context) -> Result<()> {
        (self)(ctx).await
    }
}

/// Runs for every prefixed message before command matching.
///
/// Middleware sees a context without a resolved command and cannot stop
/// propagation; a returned error is logged and the next middleware still runs.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn trigger(&self, ctx: Context) -> Result<()>;
}

#[async_trait]
impl<F, Fut> Middleware for F
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    async fn trigger(&self, ctx: Context) -> Result<()> {
        (self)(ctx).await
    }
}
