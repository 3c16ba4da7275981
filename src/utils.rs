use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use statrs::statistics::Statistics;

/// Render a feature mask as a compact 0/1 string, e.g. `10101`
pub fn mask_to_string(mask: &[bool]) -> String {
    mask.iter().map(|&g| if g { '1' } else { '0' }).collect()
}

/// Number of selected features in a mask
pub fn count_selected(mask: &[bool]) -> usize {
    mask.iter().filter(|&&g| g).count()
}

/// Indices of the selected features in a mask
pub fn selected_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter(|(_, &g)| g)
        .map(|(i, _)| i)
        .collect()
}

/// a function used essentially in CV that split randomly a Vec<T> into p Vec<T> of approximatively the same size
pub fn split_into_balanced_random_chunks<T: std::clone::Clone>(vec: Vec<T>, p: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<T>> {
    let mut shuffled = vec;
    shuffled.shuffle(rng);
    split_into_balanced_chunks(shuffled, p)
}

/// Split a Vec<T> into p contiguous chunks, the first `len % p` chunks holding one more element
pub fn split_into_balanced_chunks<T: std::clone::Clone>(vec: Vec<T>, p: usize) -> Vec<Vec<T>> {
    let n = vec.len();
    let base_size = n / p;
    let extra_elements = n % p;

    let mut chunks = Vec::with_capacity(p);
    let mut start = 0;

    for i in 0..p {
        let chunk_size = base_size + if i < extra_elements { 1 } else { 0 };
        let end = start + chunk_size;
        chunks.push(vec[start..end].to_vec());
        start = end;
    }

    chunks
}

/// Population mean and standard deviation (numpy convention, ddof = 0)
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let mean = values.mean();
    let std = values.population_std_dev();
    (mean, std)
}
