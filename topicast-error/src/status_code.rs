use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок брокера.
///
/// # Диапазоны:
/// - 1xxx: Внутренние ошибки
/// - 2xxx: Темы и доставка
/// - 3xxx: Конфигурация
/// - 6xxx: IO
///
/// `num_enum::TryFromPrimitive` даёт `TryFrom<u32>` для обратного
/// преобразования кода; `strum` и `serde_repr` подключаются фичей `extras`.
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 1xxx: Внутренние ошибки ===
    Internal = 1003,

    // === 2xxx: Темы и доставка ===
    NotFound = 2000,
    AlreadyExists = 2001,
    DeliveryFailed = 2004,

    // === 3xxx: Конфигурация ===
    InvalidConfig = 3000,
    InvalidFilter = 3001,

    // === 6xxx: IO ===
    Io = 6000,
    Timeout = 6001,
}

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
