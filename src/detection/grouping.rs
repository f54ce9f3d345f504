use crate::detection::FaceRegion;

/// Relative tolerance under which two candidate windows count as the same object.
pub const GROUP_EPS: f64 = 0.2;

/// Merge raw candidate windows into detections.
///
/// Candidates whose edges all lie within `eps * (min(w1, w2) + min(h1, h2)) / 2`
/// of each other are clustered (transitively). Each cluster becomes the
/// average of its members and survives only with more than `min_neighbors`
/// members. A surviving cluster nested inside a stronger one is dropped.
///
/// `min_neighbors == 0` disables grouping and returns the input unchanged.
pub fn group_rectangles(candidates: &[FaceRegion], min_neighbors: u32, eps: f64) -> Vec<FaceRegion> {
    if min_neighbors == 0 || candidates.is_empty() {
        return candidates.to_vec();
    }

    let labels = partition(candidates, eps);
    let class_count = labels.iter().copied().max().map_or(0, |m| m + 1);

    let mut sums = vec![[0u64; 4]; class_count];
    let mut counts = vec![0u32; class_count];
    for (rect, &label) in candidates.iter().zip(&labels) {
        let s = &mut sums[label];
        s[0] += rect.x as u64;
        s[1] += rect.y as u64;
        s[2] += rect.width as u64;
        s[3] += rect.height as u64;
        counts[label] += 1;
    }

    let clusters: Vec<(FaceRegion, u32)> = sums
        .iter()
        .zip(&counts)
        .filter(|&(_, &n)| n > min_neighbors)
        .map(|(s, &n)| {
            let avg = |v: u64| (v as f64 / n as f64).round() as u32;
            (FaceRegion::new(avg(s[0]), avg(s[1]), avg(s[2]), avg(s[3])), n)
        })
        .collect();

    clusters
        .iter()
        .enumerate()
        .filter(|&(i, &(inner, n_inner))| {
            !clusters.iter().enumerate().any(|(j, &(outer, n_outer))| {
                i != j
                    && (n_outer > n_inner.max(3) || n_inner < 3)
                    && is_nested(&inner, &outer, eps)
            })
        })
        .map(|(_, &(rect, _))| rect)
        .collect()
}

fn is_nested(inner: &FaceRegion, outer: &FaceRegion, eps: f64) -> bool {
    let dx = (outer.width as f64 * eps).round() as i64;
    let dy = (outer.height as f64 * eps).round() as i64;
    let (ix, iy) = (inner.x as i64, inner.y as i64);
    let (ox, oy) = (outer.x as i64, outer.y as i64);

    ix >= ox - dx
        && iy >= oy - dy
        && ix + inner.width as i64 <= ox + outer.width as i64 + dx
        && iy + inner.height as i64 <= oy + outer.height as i64 + dy
}

fn is_similar(a: &FaceRegion, b: &FaceRegion, eps: f64) -> bool {
    let delta = eps * (a.width.min(b.width) as f64 + a.height.min(b.height) as f64) * 0.5;
    let close = |p: u32, q: u32| (p as f64 - q as f64).abs() <= delta;

    close(a.x, b.x) && close(a.y, b.y) && close(a.right(), b.right()) && close(a.bottom(), b.bottom())
}

/// Label each candidate with a dense cluster index.
fn partition(rects: &[FaceRegion], eps: f64) -> Vec<usize> {
    let mut parent: Vec<usize> = (0..rects.len()).collect();

    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if is_similar(&rects[i], &rects[j], eps) {
                let (ri, rj) = (root(&mut parent, i), root(&mut parent, j));
                if ri != rj {
                    parent[rj] = ri;
                }
            }
        }
    }

    let mut dense = vec![usize::MAX; rects.len()];
    let mut next = 0;
    (0..rects.len())
        .map(|i| {
            let r = root(&mut parent, i);
            if dense[r] == usize::MAX {
                dense[r] = next;
                next += 1;
            }
            dense[r]
        })
        .collect()
}
