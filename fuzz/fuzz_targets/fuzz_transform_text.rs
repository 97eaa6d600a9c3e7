#![no_main]

use libfuzzer_sys::fuzz_target;
use paint3mf::Transform4;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(transform) = Transform4::deserialize(text) {
        // NaN entries never compare equal, so only check finite matrices
        let finite = transform.rows().iter().flatten().all(|v| v.is_finite());
        if finite {
            let again = Transform4::deserialize(&transform.serialize()).unwrap();
            assert_eq!(again, transform);
        }
        let _ = transform.apply((1.0, 2.0, 3.0));
    }
});
