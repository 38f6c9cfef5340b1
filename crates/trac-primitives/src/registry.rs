//! Name → primitive resolution and argument-count adjustment.
//!
//! Mirrors the source's `prim.__init__(name, fn, minargs, maxargs, exact,
//! extended)` registration calls, but as a static table built once rather
//! than populated by import-time side effects.

use std::collections::HashMap;

use crate::{arith, block, boolean, control, define, io, modeprim, PrimitiveContext, PrimResult};

pub type PrimFn = fn(&mut PrimitiveContext, &[String]) -> PrimResult;

#[derive(Clone, Copy)]
pub struct PrimitiveSpec {
    pub name: &'static str,
    pub min_args: usize,
    /// `None` means unbounded (the source's `maxargs = -1`).
    pub max_args: Option<usize>,
    pub extended: bool,
    pub func: PrimFn,
}

impl PrimitiveSpec {
    /// Pad a short argument list with empty strings and truncate an
    /// over-long one, per §4.1's resolution of the `max_args = -1` open
    /// question: pad to `min_args` only when unbounded, else to
    /// `max(min_args, max_args)`.
    pub fn adjust_args(&self, args: Vec<String>) -> Vec<String> {
        let pad_to = match self.max_args {
            Some(max) => self.min_args.max(max),
            None => self.min_args,
        };
        let mut args = args;
        if args.len() < pad_to {
            args.resize(pad_to, String::new());
        }
        if let Some(max) = self.max_args {
            args.truncate(max);
        }
        args
    }

    /// Unforgiving-mode arity check, performed before padding. Returns the
    /// `<UNF>` message text (without the surrounding tag/name) on
    /// violation.
    pub fn check_arity(&self, given: usize) -> Result<(), String> {
        if given < self.min_args {
            let ormore = self.max_args != Some(self.min_args);
            return Err(format!(
                "too few arguments: has {given}, expecting {}{}",
                self.min_args,
                if ormore { " or more" } else { "" }
            ));
        }
        if let Some(max) = self.max_args {
            if given > max {
                let atmost = max != self.min_args;
                return Err(format!(
                    "too many arguments: has {given}, expecting {}{max}",
                    if atmost { "at most " } else { "" }
                ));
            }
        }
        Ok(())
    }
}

pub struct PrimitiveRegistry {
    specs: HashMap<&'static str, PrimitiveSpec>,
}

macro_rules! spec {
    ($map:expr, $name:literal, $min:expr, $max:expr, $extended:expr, $func:expr) => {
        let s = PrimitiveSpec {
            name: $name,
            min_args: $min,
            max_args: $max,
            extended: $extended,
            func: $func,
        };
        if $map.insert($name, s).is_some() {
            panic!("duplicate primitive registration: {}", $name);
        }
    };
}

impl PrimitiveRegistry {
    /// The fixed set of primitives, in roughly Mooers' original order with
    /// the Rust-side extensions appended.
    pub fn standard() -> Self {
        let mut specs = HashMap::new();

        spec!(specs, "ps", 1, Some(1), false, io::ps as PrimFn);
        spec!(specs, "rs", 0, None, false, io::rs as PrimFn);
        spec!(specs, "cm", 1, Some(1), false, modeprim::cm as PrimFn);
        spec!(specs, "rc", 0, Some(0), false, io::rc as PrimFn);

        spec!(specs, "ds", 2, Some(2), false, define::ds as PrimFn);
        spec!(specs, "dd", 0, None, false, define::dd as PrimFn);
        spec!(specs, "da", 0, Some(0), false, define::da as PrimFn);
        spec!(specs, "ss", 1, None, false, define::ss as PrimFn);
        spec!(specs, "cl", 1, None, false, define::cl as PrimFn);
        spec!(specs, "ni", 1, Some(2), true, control::ni as PrimFn);
        spec!(specs, "cr", 1, Some(1), false, define::cr as PrimFn);
        spec!(specs, "cc", 1, Some(2), false, define::cc as PrimFn);
        spec!(specs, "cs", 1, Some(2), false, define::cs as PrimFn);
        spec!(specs, "cn", 2, Some(3), false, define::cn as PrimFn);
        spec!(specs, "in", 2, Some(3), false, define::in_ as PrimFn);

        spec!(specs, "ad", 2, Some(3), false, arith::ad as PrimFn);
        spec!(specs, "su", 2, Some(3), false, arith::su as PrimFn);
        spec!(specs, "ml", 2, Some(3), false, arith::ml as PrimFn);
        spec!(specs, "dv", 2, Some(3), false, arith::dv as PrimFn);
        spec!(specs, "rm", 2, Some(3), true, arith::rm as PrimFn);

        spec!(specs, "bu", 2, Some(2), false, boolean::bu as PrimFn);
        spec!(specs, "bi", 2, Some(2), false, boolean::bi as PrimFn);
        spec!(specs, "bc", 1, Some(1), false, boolean::bc as PrimFn);
        spec!(specs, "br", 2, Some(2), false, boolean::br as PrimFn);
        spec!(specs, "bs", 2, Some(2), false, boolean::bs as PrimFn);

        spec!(specs, "eq", 3, Some(4), false, arith::eq as PrimFn);
        spec!(specs, "gr", 3, Some(4), false, arith::gr as PrimFn);

        spec!(specs, "sb", 1, None, false, block::sb as PrimFn);
        // No upper/lower arity bound registered: `fb`/`eb` check for a
        // missing path themselves and raise a soft error, matching
        // trac.py (which registers these with no minargs/maxargs at all).
        spec!(specs, "fb", 0, None, false, block::fb as PrimFn);
        spec!(specs, "eb", 0, None, false, block::eb as PrimFn);

        spec!(specs, "ln", 1, Some(1), false, define::ln as PrimFn);
        spec!(specs, "pf", 1, Some(1), false, define::pf as PrimFn);

        spec!(specs, "tn", 0, Some(0), false, modeprim::tn as PrimFn);
        spec!(specs, "tf", 0, Some(0), false, modeprim::tf as PrimFn);
        spec!(specs, "hl", 0, Some(0), false, modeprim::hl as PrimFn);
        spec!(specs, "mo", 0, None, false, modeprim::mo as PrimFn);

        PrimitiveRegistry { specs }
    }

    pub fn get(&self, name: &str) -> Option<&PrimitiveSpec> {
        self.specs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_known_names() {
        let reg = PrimitiveRegistry::standard();
        assert!(reg.contains("ds"));
        assert!(reg.contains("rm"));
        assert!(!reg.contains("zz"));
    }

    #[test]
    fn adjust_args_pads_unbounded_to_min_only() {
        let reg = PrimitiveRegistry::standard();
        let rs = reg.get("rs").unwrap();
        assert_eq!(rs.adjust_args(vec![]), Vec::<String>::new());
    }

    #[test]
    fn adjust_args_pads_and_truncates_bounded() {
        let reg = PrimitiveRegistry::standard();
        let eq = reg.get("eq").unwrap();
        let padded = eq.adjust_args(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(padded, vec!["a", "b", "c", ""]);
        let truncated =
            eq.adjust_args(vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()]);
        assert_eq!(truncated.len(), 4);
    }

    #[test]
    fn check_arity_flags_too_few_and_too_many() {
        let reg = PrimitiveRegistry::standard();
        let ds = reg.get("ds").unwrap();
        assert!(ds.check_arity(1).is_err());
        assert!(ds.check_arity(3).is_err());
        assert!(ds.check_arity(2).is_ok());
    }
}
