#![no_main]
use libfuzzer_sys::fuzz_target;
use ndn_content::ContentObject;

fuzz_target!(|data: &[u8]| {
    if let Ok(object) = ContentObject::decode(data) {
        // Anything that decodes must have captured a region inside the input.
        let region = object.raw_signed_region().unwrap_or_default();
        assert!(region.len() <= data.len());
        let _ = object.verify_with_locator();
    }
});
