/// Returns `true` iff `candidate` is a syntactically valid CEP: exactly
/// eight ASCII decimal digits, nothing else.
///
/// No separators or surrounding whitespace are tolerated; both services
/// apply this identically (the gateway to avoid a pointless network hop,
/// the resolver because it may be called directly).
pub fn is_valid_cep(candidate: &str) -> bool {
    candidate.len() == 8 && candidate.bytes().all(|b| b.is_ascii_digit())
}
