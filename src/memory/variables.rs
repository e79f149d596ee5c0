//! The fixed variable set and the store that holds it
//!
//! The language has exactly 28 variables: `Ans`, `A` through `Z`, and `theta`.
//! They are a closed enum indexing a fixed array, so a parser-built reference
//! can never name a variable that does not exist. Hosts that only have a name
//! go through [`VariableStore::lookup`], which is the one place an
//! [`RuntimeError::UnknownVariable`] can come from.

use crate::interpreter::constants::VARIABLE_COUNT;
use crate::interpreter::errors::RuntimeError;
use std::fmt;
use std::str::FromStr;

/// One of the 28 calculator variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Var {
    Ans,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Theta,
}

impl Var {
    /// Every variable, in display order
    pub const ALL: [Var; VARIABLE_COUNT] = [
        Var::Ans,
        Var::A,
        Var::B,
        Var::C,
        Var::D,
        Var::E,
        Var::F,
        Var::G,
        Var::H,
        Var::I,
        Var::J,
        Var::K,
        Var::L,
        Var::M,
        Var::N,
        Var::O,
        Var::P,
        Var::Q,
        Var::R,
        Var::S,
        Var::T,
        Var::U,
        Var::V,
        Var::W,
        Var::X,
        Var::Y,
        Var::Z,
        Var::Theta,
    ];

    /// The spelling used in source text
    pub fn name(self) -> &'static str {
        match self {
            Var::Ans => "Ans",
            Var::A => "A",
            Var::B => "B",
            Var::C => "C",
            Var::D => "D",
            Var::E => "E",
            Var::F => "F",
            Var::G => "G",
            Var::H => "H",
            Var::I => "I",
            Var::J => "J",
            Var::K => "K",
            Var::L => "L",
            Var::M => "M",
            Var::N => "N",
            Var::O => "O",
            Var::P => "P",
            Var::Q => "Q",
            Var::R => "R",
            Var::S => "S",
            Var::T => "T",
            Var::U => "U",
            Var::V => "V",
            Var::W => "W",
            Var::X => "X",
            Var::Y => "Y",
            Var::Z => "Z",
            Var::Theta => "theta",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Var {
    type Err = RuntimeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Var::ALL
            .iter()
            .copied()
            .find(|var| var.name() == name)
            .ok_or_else(|| RuntimeError::UnknownVariable {
                name: name.to_string(),
            })
    }
}

/// Receives every successful variable write.
pub trait VariableObserver {
    fn on_variable_changed(&mut self, var: Var, value: f64);

    /// Called once a reset has zeroed every variable, after the 28 zero
    /// notifications.
    fn on_reset(&mut self) {}
}

/// Discards notifications
impl VariableObserver for () {
    fn on_variable_changed(&mut self, _var: Var, _value: f64) {}
}

/// Values of all 28 variables plus the observer that watches them
#[derive(Debug)]
pub struct VariableStore<O: VariableObserver> {
    values: [f64; VARIABLE_COUNT],
    observer: O,
}

impl<O: VariableObserver> VariableStore<O> {
    pub fn new(observer: O) -> Self {
        Self {
            values: [0.0; VARIABLE_COUNT],
            observer,
        }
    }

    pub fn get(&self, var: Var) -> f64 {
        self.values[var.index()]
    }

    /// Look a variable up by its source spelling
    pub fn lookup(&self, name: &str) -> Result<f64, RuntimeError> {
        let var: Var = name.parse()?;
        Ok(self.get(var))
    }

    /// Store `value` and notify the observer.
    ///
    /// A non-finite value is rejected without being stored; the caller is
    /// expected to abort the run.
    pub fn set(&mut self, var: Var, value: f64) -> Result<(), RuntimeError> {
        if !value.is_finite() {
            return Err(RuntimeError::NonFinite { var, value });
        }
        tracing::trace!(%var, value, "variable write");
        self.values[var.index()] = value;
        self.observer.on_variable_changed(var, value);
        Ok(())
    }

    /// Zero every variable, telling the observer about each one.
    pub fn reset(&mut self) {
        self.values = [0.0; VARIABLE_COUNT];
        for var in Var::ALL {
            self.observer.on_variable_changed(var, 0.0);
        }
        self.observer.on_reset();
    }

    /// All values in [`Var::ALL`] order
    pub fn values(&self) -> &[f64; VARIABLE_COUNT] {
        &self.values
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(Var, f64)>);

    impl VariableObserver for Recorder {
        fn on_variable_changed(&mut self, var: Var, value: f64) {
            self.0.push((var, value));
        }
    }

    #[test]
    fn test_reset_zeroes_every_variable() {
        let mut store = VariableStore::new(());
        for (i, var) in Var::ALL.iter().enumerate() {
            store.set(*var, i as f64 + 1.0).unwrap();
        }
        store.reset();
        for var in Var::ALL {
            assert_eq!(store.get(var), 0.0, "{} not reset", var);
        }
    }

    #[test]
    fn test_set_notifies_observer() {
        let mut store = VariableStore::new(Recorder::default());
        store.set(Var::A, 3.5).unwrap();
        store.set(Var::Theta, -1.0).unwrap();
        assert_eq!(store.observer().0, vec![(Var::A, 3.5), (Var::Theta, -1.0)]);
    }

    #[test]
    fn test_reset_notifies_zero_for_all() {
        let mut store = VariableStore::new(Recorder::default());
        store.set(Var::Q, 9.0).unwrap();
        store.observer_mut().0.clear();
        store.reset();
        let seen = &store.observer().0;
        assert_eq!(seen.len(), VARIABLE_COUNT);
        assert!(seen.iter().all(|(_, value)| *value == 0.0));
    }

    #[test]
    fn test_non_finite_is_rejected() {
        let mut store = VariableStore::new(Recorder::default());
        store.set(Var::B, 2.0).unwrap();

        let err = store.set(Var::B, f64::INFINITY).unwrap_err();
        assert!(matches!(err, RuntimeError::NonFinite { var: Var::B, .. }));
        assert!(store.set(Var::B, f64::NAN).is_err());
        assert!(store.set(Var::B, f64::NEG_INFINITY).is_err());

        // Value and observer both untouched by the rejected writes
        assert_eq!(store.get(Var::B), 2.0);
        assert_eq!(store.observer().0, vec![(Var::B, 2.0)]);
    }

    #[test]
    fn test_lookup_by_name() {
        let mut store = VariableStore::new(());
        store.set(Var::Theta, 0.25).unwrap();
        assert_eq!(store.lookup("theta").unwrap(), 0.25);
        assert_eq!(store.lookup("Ans").unwrap(), 0.0);

        let err = store.lookup("foo").unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownVariable { ref name } if name == "foo"));
    }

    #[test]
    fn test_names_round_trip_through_from_str() {
        for var in Var::ALL {
            assert_eq!(var.name().parse::<Var>().unwrap(), var);
        }
        assert!("a".parse::<Var>().is_err());
        assert!("Theta".parse::<Var>().is_err());
    }
}
