//! Type-erased request handlers.

use std::fmt;
use std::sync::Arc;

use crate::routing::params::Params;

/// Error type returned by failing handlers.
pub type BoxError = tower::BoxError;

/// A callable that turns a request context plus path bindings into a response.
///
/// Implemented for every `Fn(C, Params) -> Result<R, BoxError>` closure, so
/// most callers never name this trait.
pub trait Handler<C, R>: Send + Sync + 'static {
    fn call(&self, ctx: C, params: Params) -> Result<R, BoxError>;
}

impl<C, R, F> Handler<C, R> for F
where
    F: Fn(C, Params) -> Result<R, BoxError> + Send + Sync + 'static,
{
    fn call(&self, ctx: C, params: Params) -> Result<R, BoxError> {
        self(ctx, params)
    }
}

/// Shared handle stored in the handler table.
pub struct BoxedHandler<C, R>(Arc<dyn Handler<C, R>>);

impl<C: 'static, R: 'static> BoxedHandler<C, R> {
    pub fn new<H: Handler<C, R>>(handler: H) -> Self {
        Self(Arc::new(handler))
    }

    pub fn call(&self, ctx: C, params: Params) -> Result<R, BoxError> {
        self.0.call(ctx, params)
    }
}

// Manual impl: deriving would require `C: Clone + R: Clone`.
impl<C, R> Clone for BoxedHandler<C, R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<C, R> fmt::Debug for BoxedHandler<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<handler>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl Handler<(), String> for Fixed {
        fn call(&self, _ctx: (), _params: Params) -> Result<String, BoxError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_closure_and_struct_handlers() {
        let closure = BoxedHandler::new(|n: u32, params: Params| -> Result<u32, BoxError> {
            Ok(n + params.len() as u32)
        });
        assert_eq!(closure.call(41, Params::new()).unwrap(), 41);

        let fixed = BoxedHandler::new(Fixed("ok"));
        let cloned = fixed.clone();
        assert_eq!(cloned.call((), Params::new()).unwrap(), "ok");
    }

    #[test]
    fn test_failure_is_returned() {
        let failing = BoxedHandler::new(|_: (), _: Params| -> Result<(), BoxError> {
            Err("boom".into())
        });
        let err = failing.call((), Params::new()).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
