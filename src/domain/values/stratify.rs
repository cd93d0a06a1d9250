/// Largest-remainder (Hamilton) apportionment of `target` across strata
/// proportionally to `populations`. The result always sums to exactly
/// `target` when total population is non-zero; an allocation may exceed its
/// stratum's population — the sampler redistributes that shortfall.
pub fn largest_remainder(target: usize, populations: &[usize]) -> Vec<usize> {
    let total: usize = populations.iter().sum();
    if total == 0 || target == 0 {
        return vec![0; populations.len()];
    }

    let mut allocations: Vec<usize> = Vec::with_capacity(populations.len());
    let mut remainders: Vec<(usize, f64)> = Vec::with_capacity(populations.len());
    for (i, &pop) in populations.iter().enumerate() {
        let quota = target as f64 * pop as f64 / total as f64;
        allocations.push(quota.floor() as usize);
        remainders.push((i, quota - quota.floor()));
    }

    let mut leftover = target - allocations.iter().sum::<usize>();
    // Largest fractional remainder first; population then index break ties
    // so the result is deterministic.
    remainders.sort_by(|&(i, ra), &(j, rb)| {
        rb.partial_cmp(&ra)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(populations[j].cmp(&populations[i]))
            .then(i.cmp(&j))
    });
    for &(i, _) in &remainders {
        if leftover == 0 {
            break;
        }
        allocations[i] += 1;
        leftover -= 1;
    }

    allocations
}
