//! Candidate filtering and the create-new decision.

use typeahead_types::OptionWrapper;

/// Produce the dropdown rows for `input`.
///
/// Rows are the candidates whose resolved label contains `input`
/// case-insensitively, in their original order. An empty `input` yields no
/// rows. When nothing matches and `create_prompt` is set, a single synthetic
/// create-new row for `input` is returned instead.
///
/// The function is pure: the same candidates and input always produce the
/// same rows.
pub fn filter_options<T, F>(candidates: &[T], label_of: F, input: &str, create_prompt: Option<&str>) -> Vec<OptionWrapper<T>>
where
    T: Clone,
    F: Fn(&T) -> String,
{
    if input.is_empty() {
        return Vec::new();
    }

    let needle = input.to_lowercase();
    let matches: Vec<OptionWrapper<T>> = candidates
        .iter()
        .filter_map(|candidate| {
            let label = label_of(candidate);
            label
                .to_lowercase()
                .contains(&needle)
                .then(|| OptionWrapper::candidate(candidate.clone(), label))
        })
        .collect();

    match create_prompt {
        Some(prompt) if matches.is_empty() => vec![OptionWrapper::create_new(input, prompt)],
        _ => matches,
    }
}
