use std::fmt;
use std::rc::Rc;

/// A declared mark property: either a single constant shared by every datum,
/// or a function evaluated once per datum.
///
/// Derived functions receive only the data element. Values are shared with
/// `Rc` because property evaluation is single threaded.
pub enum PropertyValue<D, T> {
    Constant(T),
    Derived(Rc<dyn Fn(&D) -> T>),
}

impl<D, T: Clone> PropertyValue<D, T> {
    /// Wraps a per-datum function.
    pub fn derived(f: impl Fn(&D) -> T + 'static) -> Self {
        Self::Derived(Rc::new(f))
    }

    /// Resolves this property for one datum.
    pub fn eval(&self, datum: &D) -> T {
        match self {
            PropertyValue::Constant(value) => value.clone(),
            PropertyValue::Derived(f) => f(datum),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, PropertyValue::Constant(_))
    }

    /// Applies `f` to every value this property produces.
    pub fn map<U>(self, f: impl Fn(T) -> U + 'static) -> PropertyValue<D, U>
    where
        D: 'static,
        T: 'static,
        U: Clone,
    {
        match self {
            PropertyValue::Constant(value) => PropertyValue::Constant(f(value)),
            PropertyValue::Derived(g) => {
                PropertyValue::Derived(Rc::new(move |datum: &D| f(g(datum))))
            }
        }
    }
}

impl<D, T: Clone> Clone for PropertyValue<D, T> {
    fn clone(&self) -> Self {
        match self {
            PropertyValue::Constant(value) => PropertyValue::Constant(value.clone()),
            PropertyValue::Derived(f) => PropertyValue::Derived(f.clone()),
        }
    }
}

impl<D, T: fmt::Debug> fmt::Debug for PropertyValue<D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            PropertyValue::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl<D, T: Clone> From<T> for PropertyValue<D, T> {
    fn from(value: T) -> Self {
        PropertyValue::Constant(value)
    }
}
