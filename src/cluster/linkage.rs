//! Agglomerative clustering over cosine distance.
//!
//! Bottom-up average-linkage merging with a distance-threshold cut instead of
//! a fixed cluster count. The number of natural change clusters in a diff is
//! unknown ahead of time, so the threshold decides where the dendrogram stops
//! merging.

/// Cosine distance between two vectors: `1 - cosine_similarity`.
///
/// Zero-norm vectors have similarity 0 with everything, giving distance 1.
/// Callers must pass vectors of equal dimension; the dot product runs over
/// the shorter of the two.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

/// Cluster vectors by average-linkage agglomerative merging.
///
/// Merging stops once the closest pair of clusters sits at or above
/// `distance_threshold`. Returns one label per input vector; labels are
/// numbered by each cluster's first member in input order, so the assignment
/// is deterministic for a given input.
pub fn cluster_by_threshold(vectors: &[Vec<f32>], distance_threshold: f32) -> Vec<usize> {
    let n = vectors.len();
    if n == 0 {
        return Vec::new();
    }

    // Pairwise point distances, computed once
    let mut point_dist = vec![vec![0.0f32; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = cosine_distance(&vectors[i], &vectors[j]);
            point_dist[i][j] = d;
            point_dist[j][i] = d;
        }
    }

    // Clusters as member-index sets; merge the closest pair until the cut
    let mut clusters: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();

    while clusters.len() > 1 {
        let mut best: Option<(usize, usize, f32)> = None;

        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                let d = average_linkage(&clusters[i], &clusters[j], &point_dist);
                if best.is_none_or(|(_, _, best_d)| d < best_d) {
                    best = Some((i, j, d));
                }
            }
        }

        let (i, j, d) = best.expect("at least two clusters");
        if d >= distance_threshold {
            break;
        }

        let merged = clusters.swap_remove(j);
        clusters[i].extend(merged);
    }

    // Label clusters by their earliest member so output is input-ordered
    for cluster in &mut clusters {
        cluster.sort_unstable();
    }
    clusters.sort_unstable_by_key(|c| c[0]);

    let mut labels = vec![0usize; n];
    for (label, cluster) in clusters.iter().enumerate() {
        for &member in cluster {
            labels[member] = label;
        }
    }
    labels
}

/// Mean pairwise distance between the members of two clusters.
fn average_linkage(a: &[usize], b: &[usize], point_dist: &[Vec<f32>]) -> f32 {
    let mut sum = 0.0f32;
    for &i in a {
        for &j in b {
            sum += point_dist[i][j];
        }
    }
    sum / (a.len() * b.len()) as f32
}
