use super::error::Error;
use crate::model::fiber::Fiber;
use std::collections::BTreeMap;

/// Maps engine-assigned fiber ids (`"0"`, `"1"`, ...) back to the ids submitted
/// in the listing, by position.
///
/// The engine is assumed to keep submission order and neither split nor merge
/// fibers; any decoded set that does not line up one-to-one is rejected.
pub fn remap_fiber_ids(
    original_ids: &[String],
    decoded: BTreeMap<String, Fiber>,
) -> Result<BTreeMap<String, Fiber>, Error> {
    let submitted = original_ids.len();
    if decoded.len() != submitted {
        return Err(Error::unmappable(
            submitted,
            decoded.len(),
            "fiber count changed during the engine run",
        ));
    }

    let total = decoded.len();
    let mut remapped = BTreeMap::new();
    for (engine_id, mut fiber) in decoded {
        let original = engine_id
            .parse::<usize>()
            .ok()
            .and_then(|idx| original_ids.get(idx))
            .ok_or_else(|| {
                Error::unmappable(
                    submitted,
                    total,
                    format!("engine fiber id '{engine_id}' has no submitted counterpart"),
                )
            })?;
        fiber.id = original.clone();
        if remapped.insert(original.clone(), fiber).is_some() {
            return Err(Error::unmappable(
                submitted,
                total,
                format!("engine fiber id '{engine_id}' maps onto '{original}' a second time"),
            ));
        }
    }
    Ok(remapped)
}
