use rand::Rng;

pub const MIN_REQUEST_ID: u32 = 1;
pub const MAX_REQUEST_ID: u32 = 100_000_000;

/// Random id in `[1, 100000000]` from the calling thread's generator.
/// Collisions are possible and not checked.
pub fn generate_request_id() -> u32 {
    rand::rng().random_range(MIN_REQUEST_ID..=MAX_REQUEST_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_stay_in_range() {
        for _ in 0..10_000 {
            let id = generate_request_id();
            assert!((MIN_REQUEST_ID..=MAX_REQUEST_ID).contains(&id));
        }
    }
}
