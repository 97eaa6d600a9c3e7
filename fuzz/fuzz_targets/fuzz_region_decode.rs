#![no_main]

use libfuzzer_sys::fuzz_target;
use paint3mf::{RegionCodec, ZlibRunCodec, partition_ids};

fuzz_target!(|data: &[u8]| {
    let Ok(runs) = ZlibRunCodec.decode(data) else {
        return;
    };

    // A decoded sequence always partitions its own length
    let total = runs.total_len();
    if total > 0 {
        let pairs = partition_ids(0, total, Some(&runs)).unwrap();
        assert_eq!(pairs.len(), runs.len());
        assert_eq!(pairs.last().map(|p| p.last_id), Some(total - 1));
    }
});
