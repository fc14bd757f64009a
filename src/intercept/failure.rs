//! Failure taxonomy for monitored calls.
//!
//! # Responsibilities
//! - Give every failure a type name and, where known, an origin
//! - Decide which failures a declaration logs without their cause chain
//! - Turn a caught panic into a loggable failure

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::compose::FailureDetails;

/// Source class reported when a failure carries no origin.
pub const UNKNOWN_SOURCE: &str = "somewhere";

/// Source line reported when a failure carries no origin.
pub const UNKNOWN_LINE: i64 = -1;

/// An error a monitored call can fail with.
pub trait Failure: Error + 'static {
    /// Name rendered as the failure's class.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Where the failure was raised, when recorded.
    fn origin(&self) -> Option<&'static Location<'static>> {
        None
    }

    /// The error matched against ignore lists and logged as the cause.
    fn as_error(&self) -> &(dyn Error + 'static)
    where
        Self: Sized,
    {
        self
    }
}

impl Failure for std::io::Error {}
impl Failure for std::fmt::Error {}
impl Failure for std::num::ParseIntError {}
impl Failure for std::num::ParseFloatError {}
impl Failure for std::num::TryFromIntError {}
impl Failure for std::str::ParseBoolError {}
impl Failure for std::str::Utf8Error {}
impl Failure for std::string::FromUtf8Error {}
impl Failure for serde_json::Error {}

/// An error paired with the location it was raised at.
///
/// Displays and chains exactly like the wrapped error.
///
/// ```
/// use loggable::{Failure, Located};
///
/// let err: Located<std::fmt::Error> = std::fmt::Error.into();
/// assert!(err.origin().is_some());
/// ```
#[derive(Debug)]
pub struct Located<E> {
    error: E,
    location: &'static Location<'static>,
}

impl<E> Located<E> {
    #[track_caller]
    pub fn new(error: E) -> Self {
        Self {
            error,
            location: Location::caller(),
        }
    }

    pub fn get_ref(&self) -> &E {
        &self.error
    }

    pub fn into_inner(self) -> E {
        self.error
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl<E> From<E> for Located<E> {
    #[track_caller]
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl<E: fmt::Display> fmt::Display for Located<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<E: Error + 'static> Error for Located<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.error.source()
    }
}

impl<E: Error + 'static> Failure for Located<E> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    fn origin(&self) -> Option<&'static Location<'static>> {
        Some(self.location)
    }

    fn as_error(&self) -> &(dyn Error + 'static)
    where
        Self: Sized,
    {
        &self.error
    }
}

/// A panic caught while a monitored call ran.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Panic {
    message: String,
}

impl Panic {
    /// Recover the panic message from a `catch_unwind` payload.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Failure for Panic {
    fn type_name(&self) -> &'static str {
        "panic"
    }
}

type Matcher = Arc<dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync>;

/// A kind of failure logged at ERROR without its cause chain.
///
/// Built with [`of`](Self::of) or [`when`](Self::when), a failure matches
/// when it or any error in its `source()` chain is of the named type and
/// passes the predicate. [`exactly`](Self::exactly) looks at the failure
/// itself only.
#[derive(Clone)]
pub struct IgnoredFailure {
    name: &'static str,
    matcher: Matcher,
    whole_chain: bool,
}

impl IgnoredFailure {
    /// Ignore every error of type `E`, or caused by one.
    ///
    /// An `E` anywhere in the `source()` chain counts, so `of::<io::Error>()`
    /// also drops the cause of a domain error wrapping an I/O failure. Use
    /// [`exactly`](Self::exactly) to match the outermost error alone.
    pub fn of<E: Error + 'static>() -> Self {
        Self::when::<E>(|_| true)
    }

    /// Ignore errors whose own type is `E`; their sources are not inspected.
    pub fn exactly<E: Error + 'static>() -> Self {
        Self {
            whole_chain: false,
            ..Self::of::<E>()
        }
    }

    /// Ignore errors of type `E` for which `predicate` holds.
    pub fn when<E: Error + 'static>(
        predicate: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: std::any::type_name::<E>(),
            matcher: Arc::new(move |err: &(dyn Error + 'static)| {
                err.downcast_ref::<E>().is_some_and(&predicate)
            }),
            whole_chain: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        let mut current = Some(err);
        while let Some(err) = current {
            if (self.matcher)(err) {
                return true;
            }
            if !self.whole_chain {
                break;
            }
            current = err.source();
        }
        false
    }
}

impl fmt::Debug for IgnoredFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IgnoredFailure").field(&self.name).finish()
    }
}

/// The fields a composer renders for `failure`.
pub fn describe<E: Failure + ?Sized>(failure: &E) -> FailureDetails {
    let (source_class, source_line) = match failure.origin() {
        Some(location) => (location.file().to_string(), i64::from(location.line())),
        None => (UNKNOWN_SOURCE.to_string(), UNKNOWN_LINE),
    };
    FailureDetails {
        class_name: failure.type_name().to_string(),
        message: failure.to_string(),
        source_class,
        source_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("restock failed")]
    struct RestockError {
        #[source]
        cause: io::Error,
    }

    impl Failure for RestockError {}

    #[test]
    fn test_describe_without_origin() {
        let err = io::Error::new(io::ErrorKind::Other, "disk full");
        let details = describe(&err);
        assert_eq!(details.class_name, "std::io::error::Error");
        assert_eq!(details.message, "disk full");
        assert_eq!(details.source_class, UNKNOWN_SOURCE);
        assert_eq!(details.source_line, UNKNOWN_LINE);
    }

    #[test]
    fn test_describe_located() {
        let line = line!() + 1;
        let err = Located::new(std::fmt::Error);
        let details = describe(&err);
        assert_eq!(details.class_name, "core::fmt::Error");
        assert_eq!(details.source_class, file!());
        assert_eq!(details.source_line, i64::from(line));
    }

    #[test]
    fn test_panic_payload() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(Panic::from_payload(payload.as_ref()).message(), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(Panic::from_payload(payload.as_ref()).message(), "bang");

        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(describe(&Panic::from_payload(payload.as_ref())).class_name, "panic");
    }

    #[test]
    fn test_ignored_walks_source_chain() {
        let err = RestockError {
            cause: io::Error::new(io::ErrorKind::TimedOut, "slow disk"),
        };
        assert!(IgnoredFailure::of::<io::Error>().matches(&err));
        assert!(IgnoredFailure::of::<RestockError>().matches(&err));
        assert!(!IgnoredFailure::of::<std::fmt::Error>().matches(&err));
    }

    #[test]
    fn test_exactly_ignores_outermost_only() {
        let err = RestockError {
            cause: io::Error::new(io::ErrorKind::TimedOut, "slow disk"),
        };
        assert!(!IgnoredFailure::exactly::<io::Error>().matches(&err));
        assert!(IgnoredFailure::exactly::<RestockError>().matches(&err));
        assert!(IgnoredFailure::exactly::<io::Error>().matches(&err.cause));
    }

    #[test]
    fn test_located_is_transparent() {
        let err = Located::new(RestockError {
            cause: io::Error::new(io::ErrorKind::TimedOut, "slow disk"),
        });
        assert_eq!(err.to_string(), "restock failed");
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("slow disk"));
        assert!(IgnoredFailure::of::<RestockError>().matches(err.as_error()));
        assert_eq!(describe(&err).class_name, std::any::type_name::<RestockError>());
    }

    #[test]
    fn test_ignored_predicate() {
        let timed_out = IgnoredFailure::when::<io::Error>(|e| e.kind() == io::ErrorKind::TimedOut);
        assert!(timed_out.matches(&io::Error::new(io::ErrorKind::TimedOut, "t")));
        assert!(!timed_out.matches(&io::Error::new(io::ErrorKind::NotFound, "n")));
        assert_eq!(format!("{timed_out:?}"), "IgnoredFailure(\"std::io::error::Error\")");
    }
}
