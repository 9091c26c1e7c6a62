use dnacodec::{
    arithmetic_decode, arithmetic_encode, build_models, huffman_decode, huffman_encode, Error,
    Nucleotide,
};
use test_case::test_case;

#[test_case("AAAACCCGGT" ; "skewed four symbols")]
#[test_case("ACGT" ; "uniform")]
#[test_case("GATTACA" ; "three symbols")]
#[test_case("A" ; "single base")]
#[test_case("TTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTT" ; "long run")]
fn round_trip_both_ways(input: &str) {
    let models = build_models(input).unwrap();

    let bits = huffman_encode(&models.sequence, &models.huffman_codes).unwrap();
    assert_eq!(
        huffman_decode(&bits, &models.huffman_codes).unwrap(),
        models.sequence
    );

    let model = models.arithmetic().unwrap();
    let code = arithmetic_encode(&models.sequence, model).unwrap();
    assert_eq!(code.length, input.len());
    assert_eq!(
        arithmetic_decode(code.value, code.length, model).unwrap(),
        models.sequence
    );
}

#[test]
fn skewed_sequence_favours_most_frequent() {
    let models = build_models("AAAACCCGGT").unwrap();
    let codes = &models.huffman_codes;
    assert_eq!(codes.len(), 4);
    assert!(codes.is_prefix_free());

    let a_len = codes.code(Nucleotide::A).unwrap().len();
    for (_, code) in codes.iter() {
        assert!(!code.is_empty());
        assert!(a_len <= code.len());
    }
}

#[test]
fn single_base_gets_singleton_code() {
    let models = build_models("A").unwrap();
    assert_eq!(models.huffman_codes.len(), 1);
    assert_eq!(models.huffman_codes.code(Nucleotide::A), Some("0"));
    assert_eq!(
        huffman_encode(&models.sequence, &models.huffman_codes).unwrap(),
        "0"
    );
}

#[test]
fn empty_sequence() {
    let models = build_models("").unwrap();
    assert_eq!(
        huffman_encode(&models.sequence, &models.huffman_codes).unwrap(),
        ""
    );
    assert_eq!(models.arithmetic().unwrap_err(), Error::EmptySequence);
}

#[test_case("AXGT", 'X', 1 ; "inner character")]
#[test_case("NACGT", 'N', 0 ; "leading character")]
#[test_case("ACG T", ' ', 3 ; "whitespace")]
#[test_case("acgt", 'a', 0 ; "lower case")]
fn invalid_symbol_rejected(input: &str, symbol: char, position: usize) {
    assert_eq!(
        build_models(input).unwrap_err(),
        Error::InvalidSymbol { symbol, position }
    );
}

#[test_case("2" ; "non binary")]
#[test_case("0112" ; "non binary after valid prefix")]
fn corrupted_bit_string(bits: &str) {
    let models = build_models("AAAACCCGGT").unwrap();
    let err = huffman_decode(bits, &models.huffman_codes).unwrap_err();
    assert!(matches!(err, Error::InvalidBit { .. }));
}
