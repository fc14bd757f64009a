//! The call lifecycle around a monitored call.

use std::any::Any;
use std::error::Error;
use std::future::Future;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;

use crate::compose::{Call, ComposerKind, FailureDetails, LoggerFormats, MessageComposer};
use crate::config::LoggerConfig;
use crate::format::{ToValue, Value};
use crate::intercept::declaration::Loggable;
use crate::intercept::failure::{describe, Failure, Panic};
use crate::intercept::join_point::JoinPoint;
use crate::intercept::selection::{Registry, Visibility};
use crate::observability::metrics::{self, Outcome};
use crate::sink::{LogLevel, LogSink, TracingSink};
use crate::watchdog::{Registration, Watchdog, DEFAULT_PERIOD};

/// Wraps calls with enter, completion, failure and slow-call logging.
///
/// Construct once per process with [`Interceptor::builder`] and share it;
/// every call it wraps is independent of the others.
pub struct Interceptor {
    sink: Arc<dyn LogSink>,
    composer: Arc<dyn MessageComposer>,
    watchdog: Watchdog,
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("watchdog", &self.watchdog)
            .finish_non_exhaustive()
    }
}

impl Interceptor {
    pub fn builder() -> InterceptorBuilder {
        InterceptorBuilder::default()
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    pub fn watchdog(&self) -> &Watchdog {
        &self.watchdog
    }

    /// Run `f` as a monitored call.
    ///
    /// A panic in `f` is logged as a failure and then resumed.
    pub fn invoke<T, F>(
        &self,
        join_point: &JoinPoint,
        declaration: &Loggable,
        args: Vec<Value>,
        f: F,
    ) -> T
    where
        T: ToValue,
        F: FnOnce() -> T,
    {
        let call = ActiveCall::begin(self, join_point, declaration, args);
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => {
                call.succeeded(&value);
                value
            }
            Err(payload) => {
                call.panicked(payload.as_ref());
                drop(call);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Run a fallible `f` as a monitored call; its error is returned unchanged.
    pub fn try_invoke<T, E, F>(
        &self,
        join_point: &JoinPoint,
        declaration: &Loggable,
        args: Vec<Value>,
        f: F,
    ) -> Result<T, E>
    where
        T: ToValue,
        E: Failure,
        F: FnOnce() -> Result<T, E>,
    {
        let call = ActiveCall::begin(self, join_point, declaration, args);
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => {
                call.succeeded(&value);
                Ok(value)
            }
            Ok(Err(err)) => {
                call.failed(&err);
                Err(err)
            }
            Err(payload) => {
                call.panicked(payload.as_ref());
                drop(call);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Await `future` as a monitored call.
    pub async fn invoke_async<T, Fut>(
        &self,
        join_point: &JoinPoint,
        declaration: &Loggable,
        args: Vec<Value>,
        future: Fut,
    ) -> T
    where
        T: ToValue,
        Fut: Future<Output = T>,
    {
        let call = ActiveCall::begin(self, join_point, declaration, args);
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(value) => {
                call.succeeded(&value);
                value
            }
            Err(payload) => {
                call.panicked(payload.as_ref());
                drop(call);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Await a fallible `future` as a monitored call.
    pub async fn try_invoke_async<T, E, Fut>(
        &self,
        join_point: &JoinPoint,
        declaration: &Loggable,
        args: Vec<Value>,
        future: Fut,
    ) -> Result<T, E>
    where
        T: ToValue,
        E: Failure,
        Fut: Future<Output = Result<T, E>>,
    {
        let call = ActiveCall::begin(self, join_point, declaration, args);
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(value)) => {
                call.succeeded(&value);
                Ok(value)
            }
            Ok(Err(err)) => {
                call.failed(&err);
                Err(err)
            }
            Err(payload) => {
                call.panicked(payload.as_ref());
                drop(call);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Run `f`, monitored only if `registry` selects the call.
    pub fn dispatch<T, F>(
        &self,
        registry: &Registry,
        join_point: &JoinPoint,
        visibility: Visibility,
        args: impl FnOnce() -> Vec<Value>,
        f: F,
    ) -> T
    where
        T: ToValue,
        F: FnOnce() -> T,
    {
        match registry.resolve(join_point, visibility) {
            Some(declaration) => self.invoke(join_point, &declaration, args(), f),
            None => f(),
        }
    }

    /// Fallible form of [`Interceptor::dispatch`].
    pub fn try_dispatch<T, E, F>(
        &self,
        registry: &Registry,
        join_point: &JoinPoint,
        visibility: Visibility,
        args: impl FnOnce() -> Vec<Value>,
        f: F,
    ) -> Result<T, E>
    where
        T: ToValue,
        E: Failure,
        F: FnOnce() -> Result<T, E>,
    {
        match registry.resolve(join_point, visibility) {
            Some(declaration) => self.try_invoke(join_point, &declaration, args(), f),
            None => f(),
        }
    }
}

/// One monitored call between start and completion.
///
/// Dropping it deregisters the call from the watchdog, whichever way the
/// call ended.
struct ActiveCall<'a> {
    interceptor: &'a Interceptor,
    join_point: &'a JoinPoint,
    declaration: &'a Loggable,
    args: Vec<Value>,
    start: Instant,
    _registration: Option<Registration<'a>>,
}

impl<'a> ActiveCall<'a> {
    fn begin(
        interceptor: &'a Interceptor,
        join_point: &'a JoinPoint,
        declaration: &'a Loggable,
        args: Vec<Value>,
    ) -> Self {
        let start = Instant::now();
        let target = declaration.target(join_point);

        let registration = (declaration.warn_over.is_some()
            && interceptor.sink.is_enabled(LogLevel::Warn, target))
        .then(|| {
            interceptor
                .watchdog
                .register(join_point, declaration, &args, start)
        });

        let call = Self {
            interceptor,
            join_point,
            declaration,
            args,
            start,
            _registration: registration,
        };
        if declaration.entered {
            call.emit(declaration.level, |c| call.composer().enter(c));
        }
        call
    }

    fn composer(&self) -> &dyn MessageComposer {
        self.interceptor.composer.as_ref()
    }

    fn target(&self) -> &str {
        self.declaration.target(self.join_point)
    }

    fn view(&self) -> Call<'_> {
        Call {
            method: self.join_point.method(),
            args: &self.args,
            declaration: self.declaration,
        }
    }

    /// Compose and log only when `level` is enabled for this call's logger.
    fn emit(&self, level: LogLevel, compose: impl FnOnce(&Call<'_>) -> String) {
        let sink = &self.interceptor.sink;
        if sink.is_enabled(level, self.target()) {
            sink.log(level, self.target(), &compose(&self.view()));
        }
    }

    fn succeeded<T: ToValue + ?Sized>(&self, result: &T) {
        let elapsed = self.start.elapsed();
        if self.declaration.is_over(elapsed) {
            self.emit(LogLevel::Warn, |c| {
                self.composer().warn_after(c, &result.to_value(), elapsed)
            });
            metrics::record_slow_call();
        } else {
            self.emit(self.declaration.level, |c| {
                self.composer().after(c, &result.to_value(), elapsed)
            });
        }
        metrics::record_call(Outcome::Succeeded, elapsed);
    }

    fn failed<E: Failure>(&self, err: &E) {
        let elapsed = self.start.elapsed();
        let cause = err.as_error();
        let cause = (!self.declaration.ignores(cause)).then_some(cause);
        self.log_failure(&describe(err), cause, elapsed);
        metrics::record_call(Outcome::Failed, elapsed);
    }

    fn panicked(&self, payload: &(dyn Any + Send)) {
        let elapsed = self.start.elapsed();
        let failure = Panic::from_payload(payload);
        self.log_failure(&describe(&failure), Some(&failure as &(dyn Error + 'static)), elapsed);
        metrics::record_call(Outcome::Panicked, elapsed);
    }

    fn log_failure(
        &self,
        details: &FailureDetails,
        cause: Option<&(dyn Error + 'static)>,
        elapsed: Duration,
    ) {
        let sink = &self.interceptor.sink;
        let target = self.target();
        if !sink.is_enabled(LogLevel::Error, target) {
            return;
        }
        let message = self.composer().error(&self.view(), details, elapsed);
        match cause {
            Some(cause) => sink.log_with_cause(LogLevel::Error, target, &message, cause),
            None => sink.log(LogLevel::Error, target, &message),
        }
    }
}

/// Builder for [`Interceptor`].
pub struct InterceptorBuilder {
    sink: Option<Arc<dyn LogSink>>,
    composer: Option<Arc<dyn MessageComposer>>,
    formats: LoggerFormats,
    kind: ComposerKind,
    watchdog_period: Duration,
}

impl Default for InterceptorBuilder {
    fn default() -> Self {
        Self {
            sink: None,
            composer: None,
            formats: LoggerFormats::default(),
            kind: ComposerKind::default(),
            watchdog_period: DEFAULT_PERIOD,
        }
    }
}

impl InterceptorBuilder {
    /// Where messages go; a [`TracingSink`] by default.
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn formats(mut self, formats: LoggerFormats) -> Self {
        self.formats = formats;
        self
    }

    pub fn composer_kind(mut self, kind: ComposerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Use `composer` instead of building one from the formats.
    pub fn composer(mut self, composer: Arc<dyn MessageComposer>) -> Self {
        self.composer = Some(composer);
        self
    }

    pub fn watchdog_period(mut self, period: Duration) -> Self {
        self.watchdog_period = period;
        self
    }

    /// Take formats, composer choice and watchdog period from `config`.
    pub fn config(self, config: &LoggerConfig) -> Self {
        self.formats(config.formats.clone())
            .composer_kind(config.composer)
            .watchdog_period(config.watchdog.period())
    }

    /// Build the interceptor and start its watchdog thread.
    pub fn build(self) -> io::Result<Interceptor> {
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingSink::default()) as Arc<dyn LogSink>);
        let composer = self
            .composer
            .unwrap_or_else(|| self.kind.build(self.formats));
        let watchdog = Watchdog::start(sink.clone(), composer.clone(), self.watchdog_period)?;

        Ok(Interceptor {
            sink,
            composer,
            watchdog,
        })
    }
}
