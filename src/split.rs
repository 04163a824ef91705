//! Seeded, stratified partitions of the sample set.
//!
//! Both partition kinds shuffle the members of each class with one
//! `StdRng` seeded from the configuration, visiting classes in index order,
//! so a given `(classes, seed)` always yields the same partition.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Sample indices for one train/evaluate partition, each list ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

fn members_by_class(classes: &[usize], n_classes: usize) -> Vec<Vec<usize>> {
    let mut members = vec![Vec::new(); n_classes];
    for (sample, &class) in classes.iter().enumerate() {
        if class < n_classes {
            members[class].push(sample);
        }
    }
    members
}

/// Per-class test quotas summing to `n_test`, largest remainders first.
fn test_quotas(class_sizes: &[usize], n_total: usize, n_test: usize) -> Vec<usize> {
    let ideal: Vec<f64> = class_sizes
        .iter()
        .map(|&size| size as f64 * n_test as f64 / n_total as f64)
        .collect();
    let mut quotas: Vec<usize> = ideal.iter().map(|x| x.floor() as usize).collect();
    let mut missing = n_test.saturating_sub(quotas.iter().sum());

    let mut by_remainder: Vec<usize> = (0..class_sizes.len()).collect();
    // Stable sort keeps lower class indices first among equal remainders
    by_remainder.sort_by(|&a, &b| {
        let ra = ideal[a] - ideal[a].floor();
        let rb = ideal[b] - ideal[b].floor();
        rb.total_cmp(&ra)
    });
    for class in by_remainder {
        if missing == 0 {
            break;
        }
        if quotas[class] < class_sizes[class] {
            quotas[class] += 1;
            missing -= 1;
        }
    }
    quotas
}

/// One stratified train/test split holding out `ceil(n * test_fraction)` samples.
///
/// The test share is clamped so both sides keep at least one sample when
/// there are two or more samples.
pub fn stratified_holdout(
    classes: &[usize],
    n_classes: usize,
    test_fraction: f64,
    seed: u64,
) -> Partition {
    let n = classes.len();
    let mut n_test = (n as f64 * test_fraction).ceil() as usize;
    if n >= 2 {
        n_test = n_test.clamp(1, n - 1);
    } else {
        n_test = 0;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut members = members_by_class(classes, n_classes);
    let sizes: Vec<usize> = members.iter().map(Vec::len).collect();
    let quotas = test_quotas(&sizes, n.max(1), n_test);

    let mut train = Vec::with_capacity(n - n_test);
    let mut test = Vec::with_capacity(n_test);
    for (class_members, quota) in members.iter_mut().zip(quotas) {
        class_members.shuffle(&mut rng);
        test.extend_from_slice(&class_members[..quota]);
        train.extend_from_slice(&class_members[quota..]);
    }
    train.sort_unstable();
    test.sort_unstable();
    Partition { train, test }
}

/// Stratified k-fold partitions; `None` when there are fewer samples than folds.
///
/// Members of each class are dealt round-robin over the folds, continuing
/// where the previous class stopped, so fold sizes differ by at most one.
pub fn stratified_folds(
    classes: &[usize],
    n_classes: usize,
    folds: usize,
    seed: u64,
) -> Option<Vec<Partition>> {
    let n = classes.len();
    if folds == 0 || n < folds {
        return None;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut fold_of = vec![0usize; n];
    let mut next_fold = 0;
    for mut class_members in members_by_class(classes, n_classes) {
        class_members.shuffle(&mut rng);
        for sample in class_members {
            fold_of[sample] = next_fold;
            next_fold = (next_fold + 1) % folds;
        }
    }

    let partitions = (0..folds)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) = (0..n).partition(|&i| fold_of[i] == fold);
            Partition { train, test }
        })
        .collect();
    Some(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced(n: usize) -> Vec<usize> {
        (0..n).map(|i| i % 2).collect()
    }

    #[test]
    fn test_holdout_sizes_and_stratification() {
        let classes = balanced(20);
        let split = stratified_holdout(&classes, 2, 0.33, 42);
        assert_eq!(split.test.len(), 7);
        assert_eq!(split.train.len(), 13);
        let test_ones = split.test.iter().filter(|&&i| classes[i] == 1).count();
        assert!(test_ones == 3 || test_ones == 4);
    }

    #[test]
    fn test_holdout_is_a_partition() {
        let classes = vec![0, 0, 0, 1, 1, 2, 2, 2, 2, 1];
        let split = stratified_holdout(&classes, 3, 0.33, 7);
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..classes.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_holdout_is_seed_deterministic() {
        let classes = balanced(30);
        assert_eq!(
            stratified_holdout(&classes, 2, 0.33, 42),
            stratified_holdout(&classes, 2, 0.33, 42)
        );
    }

    #[test]
    fn test_holdout_keeps_both_sides_non_empty() {
        let split = stratified_holdout(&[0, 1], 2, 0.33, 42);
        assert_eq!(split.train.len(), 1);
        assert_eq!(split.test.len(), 1);
    }

    #[test]
    fn test_quotas_follow_largest_remainder() {
        assert_eq!(test_quotas(&[10, 10], 20, 7), vec![4, 3]);
        assert_eq!(test_quotas(&[1, 9], 10, 3), vec![0, 3]);
    }

    #[test]
    fn test_folds_cover_every_sample_once() {
        let classes = balanced(23);
        let folds = stratified_folds(&classes, 2, 5, 42).unwrap();
        assert_eq!(folds.len(), 5);
        let mut seen: Vec<usize> = folds.iter().flat_map(|p| p.test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..23).collect::<Vec<_>>());
        for fold in &folds {
            assert!(fold.test.len() == 4 || fold.test.len() == 5);
            assert_eq!(fold.train.len() + fold.test.len(), 23);
        }
    }

    #[test]
    fn test_folds_need_enough_samples() {
        assert!(stratified_folds(&[0, 1, 0], 2, 5, 42).is_none());
    }
}
