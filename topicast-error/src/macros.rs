/// Немедленно возвращает ошибку из текущей функции.
///
/// Формы:
/// - `bail!(err)`: готовая ошибка, приводимая к `StackError`;
/// - `bail!(code, "msg")`: `GenericError` с кодом и сообщением;
/// - `bail!(code, "fmt {}", arg)`: то же с форматированием.
///
/// ```ignore
/// use topicast_error::{bail, StatusCode};
///
/// fn check_level(level: &str) -> topicast_error::TopicastResult<()> {
///     if level.is_empty() {
///         bail!(StatusCode::InvalidConfig, "log level cannot be empty");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::StackError::from($err))
    };
    ($code:expr, $msg:expr) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, $msg)
        ))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, format!($fmt, $($arg)*))
        ))
    };
}

/// Проверяет условие и вызывает `bail!`, если оно ложно.
///
/// ```ignore
/// use topicast_error::{ensure, StatusCode};
///
/// fn check_capacity(cap: usize) -> topicast_error::TopicastResult<()> {
///     ensure!(cap <= 1 << 20, StatusCode::InvalidConfig, "capacity too large: {}", cap);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            $crate::bail!($err);
        }
    };
    ($cond:expr, $code:expr, $msg:expr) => {
        if !($cond) {
            $crate::bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($code, $fmt, $($arg)*);
        }
    };
}

/// Трейт-расширение для `Result`: `.context(...)` и `.with_context(...)`
/// превращают ошибку в [`StackError`](crate::StackError) и приклеивают к ней
/// контекст.
pub trait ResultExt<T> {
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>;

    /// Ленивый контекст: строка строится только в случае ошибки.
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<crate::StackError>,
{
    #[track_caller]
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().context(ctx)),
        }
    }

    #[track_caller]
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().context(f())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BrokerError, StatusCode, TopicastResult};

    #[test]
    fn test_bail_with_broker_error() {
        fn publish_nowhere() -> TopicastResult<u64> {
            bail!(BrokerError::topic_not_found("nowhere"));
        }

        let err = publish_nowhere().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NotFound);
    }

    #[test]
    fn test_bail_with_format() {
        fn example(ms: u64) -> TopicastResult<()> {
            bail!(StatusCode::InvalidConfig, "threshold too large: {}", ms);
        }

        let err = example(42).unwrap_err();
        assert!(err.to_string().contains("threshold too large: 42"));
        assert_eq!(err.status_code(), StatusCode::InvalidConfig);
    }

    #[test]
    fn test_ensure() {
        fn validate(level: &str) -> TopicastResult<()> {
            ensure!(!level.is_empty(), StatusCode::InvalidConfig, "empty level");
            ensure!(
                level.len() < 64,
                StatusCode::InvalidConfig,
                "level too long: {}",
                level.len()
            );
            Ok(())
        }

        assert!(validate("info").is_ok());
        assert!(validate("").is_err());
        assert!(validate(&"x".repeat(100)).is_err());
    }

    #[test]
    fn test_result_ext() {
        fn inner() -> Result<(), BrokerError> {
            Err(BrokerError::duplicate_topic("tech"))
        }

        fn outer() -> TopicastResult<()> {
            inner().context("bootstrapping topics")?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.contexts().len(), 1);
        assert_eq!(err.contexts()[0].message, "bootstrapping topics");
    }

    #[test]
    fn test_with_context_lazy() {
        fn example(ok: bool) -> TopicastResult<()> {
            let result: Result<(), BrokerError> = if ok {
                Ok(())
            } else {
                Err(BrokerError::topic_not_found("x"))
            };
            result.with_context(|| format!("ok = {ok}"))?;
            Ok(())
        }

        assert!(example(true).is_ok());
        let err = example(false).unwrap_err();
        assert_eq!(err.contexts()[0].message, "ok = false");
    }
}
