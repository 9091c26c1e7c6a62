#![no_main]
use dnacodec::{
    arithmetic_decode, arithmetic_encode, build_models, huffman_decode, huffman_encode, Error,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Invalid input must be refused up front, valid input must build.
    let models = match build_models(input) {
        Ok(models) => models,
        Err(Error::InvalidSymbol { .. }) => return,
        Err(e) => panic!("unexpected error: {e}"),
    };

    let bits = huffman_encode(&models.sequence, &models.huffman_codes).unwrap();
    let decoded = huffman_decode(&bits, &models.huffman_codes).unwrap();
    assert_eq!(decoded, models.sequence);

    // The raw bytes, one bit each, must decode or leave a partial codeword.
    let noise: String = data
        .iter()
        .map(|b| if b & 1 == 0 { '0' } else { '1' })
        .collect();
    match huffman_decode(&noise, &models.huffman_codes) {
        Ok(_) | Err(Error::TrailingBits(_)) => {}
        Err(e) => panic!("unexpected error: {e}"),
    }

    let Ok(model) = models.arithmetic() else {
        assert!(models.sequence.is_empty());
        return;
    };
    match arithmetic_encode(&models.sequence, model) {
        Ok(code) => {
            let decoded = arithmetic_decode(code.value, code.length, model).unwrap();
            assert_eq!(decoded, models.sequence);
        }
        Err(Error::PrecisionExhausted { .. }) => {}
        Err(e) => panic!("unexpected error: {e}"),
    }
});
