//! `ni`, the only primitive that reads `implied_active` — grounded on
//! `trac.py`'s `ni = lambda x,y: y if activeImpliedCall else x` (credited
//! there to C.A.R. Kagan).

use crate::{PrimOutcome, PrimValue, PrimitiveContext, PrimResult};

pub fn ni(ctx: &mut PrimitiveContext, args: &[String]) -> PrimResult {
    let chosen = if ctx.mode.implied_active { &args[1] } else { &args[0] };
    Ok(PrimOutcome::Value(PrimValue::str(chosen.clone())))
}
