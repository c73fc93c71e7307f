//! Typed Rust functions callable from dialogue.
//!
//! Any `Fn` taking up to ten arguments of a [`FromVariableValue`] type and returning an [`IntoReturnValue`] type is a [`Handler`].

use smallvec::{smallvec, SmallVec};

use crate::value::{VariableKind, VariableValue};

/// Declared parameter kinds of a command, most commands take only a few.
pub type Parameters = SmallVec<[VariableKind; 4]>;

/// Argument type of a command handler.
pub trait FromVariableValue: Sized {
    /// Kind of dialogue value this type is converted from.
    const KIND: VariableKind;

    /// Convert a dialogue value, `None` when the kind doesn't match.
    fn from_value(value: &VariableValue) -> Option<Self>;
}

impl FromVariableValue for String {
    const KIND: VariableKind = VariableKind::String;

    #[inline]
    fn from_value(value: &VariableValue) -> Option<Self> {
        value.as_str().map(ToOwned::to_owned)
    }
}

impl FromVariableValue for f32 {
    const KIND: VariableKind = VariableKind::Float;

    #[inline]
    fn from_value(value: &VariableValue) -> Option<Self> {
        value.as_float()
    }
}

/// Yarn Spinner only knows a single number type, fractions are truncated.
impl FromVariableValue for i32 {
    const KIND: VariableKind = VariableKind::Float;

    #[inline]
    fn from_value(value: &VariableValue) -> Option<Self> {
        value.as_float().map(|value| value as i32)
    }
}

impl FromVariableValue for bool {
    const KIND: VariableKind = VariableKind::Bool;

    #[inline]
    fn from_value(value: &VariableValue) -> Option<Self> {
        value.as_bool()
    }
}

/// Return type of a command handler.
///
/// Handlers returning `()` are plain commands, all others are functions.
pub trait IntoReturnValue {
    /// Kind of dialogue value returned, `None` for commands.
    const KIND: Option<VariableKind>;

    /// Convert into a dialogue value.
    fn into_return_value(self) -> Option<VariableValue>;
}

impl IntoReturnValue for () {
    const KIND: Option<VariableKind> = None;

    #[inline]
    fn into_return_value(self) -> Option<VariableValue> {
        None
    }
}

impl IntoReturnValue for String {
    const KIND: Option<VariableKind> = Some(VariableKind::String);

    #[inline]
    fn into_return_value(self) -> Option<VariableValue> {
        Some(VariableValue::String(self))
    }
}

impl IntoReturnValue for &'static str {
    const KIND: Option<VariableKind> = Some(VariableKind::String);

    #[inline]
    fn into_return_value(self) -> Option<VariableValue> {
        Some(VariableValue::from(self))
    }
}

impl IntoReturnValue for f32 {
    const KIND: Option<VariableKind> = Some(VariableKind::Float);

    #[inline]
    fn into_return_value(self) -> Option<VariableValue> {
        Some(VariableValue::Float(self))
    }
}

impl IntoReturnValue for i32 {
    const KIND: Option<VariableKind> = Some(VariableKind::Float);

    #[inline]
    fn into_return_value(self) -> Option<VariableValue> {
        Some(VariableValue::from(self))
    }
}

impl IntoReturnValue for bool {
    const KIND: Option<VariableKind> = Some(VariableKind::Bool);

    #[inline]
    fn into_return_value(self) -> Option<VariableValue> {
        Some(VariableValue::Bool(self))
    }
}

/// Function that can be registered as a dialogue command.
///
/// `Args` is a tuple of the argument types, it's only used to tell the implementations for different arities apart.
pub trait Handler<Args>: 'static {
    /// Kinds of all parameters in order.
    fn parameters(&self) -> Parameters;

    /// Kind of the returned value, `None` for commands.
    fn returns(&self) -> Option<VariableKind>;

    /// Call the function.
    ///
    /// # Errors
    ///
    /// - Index of the first argument that's missing or of the wrong kind.
    fn call(&self, arguments: &[VariableValue]) -> Result<Option<VariableValue>, usize>;
}

/// Implement [`Handler`] for functions with the listed arguments.
macro_rules! impl_handler {
    ($($arg:ident $var:ident),*) => {
        impl<F, R, $($arg,)*> Handler<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + 'static,
            R: IntoReturnValue,
            $($arg: FromVariableValue,)*
        {
            #[inline]
            fn parameters(&self) -> Parameters {
                smallvec![$($arg::KIND),*]
            }

            #[inline]
            fn returns(&self) -> Option<VariableKind> {
                R::KIND
            }

            #[inline]
            #[allow(unused_variables, unused_mut, unused_assignments)]
            fn call(&self, arguments: &[VariableValue]) -> Result<Option<VariableValue>, usize> {
                let mut index = 0;
                $(
                    let $var = arguments.get(index).and_then($arg::from_value).ok_or(index)?;
                    index += 1;
                )*

                Ok((self)($($var),*).into_return_value())
            }
        }
    };
}

impl_handler!();
impl_handler!(A0 a0);
impl_handler!(A0 a0, A1 a1);
impl_handler!(A0 a0, A1 a1, A2 a2);
impl_handler!(A0 a0, A1 a1, A2 a2, A3 a3);
impl_handler!(A0 a0, A1 a1, A2 a2, A3 a3, A4 a4);
impl_handler!(A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_handler!(A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_handler!(A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_handler!(A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);
impl_handler!(A0 a0, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8, A9 a9);
