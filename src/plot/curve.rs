//! Monotone cubic smoothing in x.
//!
//! Tangents follow Steffen's method: interior tangents are limited by the
//! neighbouring secant slopes, end tangents are one-sided. Each interval is a
//! cubic Bézier with control points one third of the way along x, so the curve
//! stays between the y values of the two points it connects.
//!
//! Plotters draws polylines, so every Bézier is flattened into
//! `steps` short segments.

/// Split a series into runs of finite points; non-finite points become gaps.
pub fn finite_runs(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for &(x, y) in points {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Smooth `points` (sorted by x) into a polyline.
pub fn monotone_x(points: &[(f64, f64)], steps: usize) -> Vec<(f64, f64)> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let tangents = tangents(points);
    let steps = steps.max(1);
    let mut out = Vec::with_capacity((n - 1) * steps + 1);
    out.push(points[0]);

    for i in 0..n - 1 {
        let (x0, y0) = points[i];
        let (x1, y1) = points[i + 1];
        let dx = (x1 - x0) / 3.0;
        let c0 = (x0 + dx, y0 + dx * tangents[i]);
        let c1 = (x1 - dx, y1 - dx * tangents[i + 1]);

        for s in 1..=steps {
            let t = s as f64 / steps as f64;
            out.push(cubic_bezier(points[i], c0, c1, points[i + 1], t));
        }
    }

    out
}

fn tangents(points: &[(f64, f64)]) -> Vec<f64> {
    let n = points.len();
    let mut t = vec![0.0; n];
    for i in 1..n - 1 {
        t[i] = interior_tangent(points[i - 1], points[i], points[i + 1]);
    }
    t[0] = end_tangent(points[0], points[1], t[1]);
    t[n - 1] = end_tangent(points[n - 2], points[n - 1], t[n - 2]);
    t
}

// Non-negative zero counts as positive here, so a flat neighbour yields a zero tangent.
fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

fn interior_tangent(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let h0 = p1.0 - p0.0;
    let h1 = p2.0 - p1.0;
    let s0 = (p1.1 - p0.1) / h0;
    let s1 = (p2.1 - p1.1) / h1;
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    // Coincident x values produce NaN; treat them as flat.
    if t.is_finite() { t } else { 0.0 }
}

fn end_tangent(p0: (f64, f64), p1: (f64, f64), neighbour: f64) -> f64 {
    let h = p1.0 - p0.0;
    if h == 0.0 {
        return neighbour;
    }
    (3.0 * (p1.1 - p0.1) / h - neighbour) / 2.0
}

fn cubic_bezier(p0: (f64, f64), c0: (f64, f64), c1: (f64, f64), p1: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * c0.0 + c * c1.0 + d * p1.0,
        a * p0.1 + b * c0.1 + c * c1.1 + d * p1.1,
    )
}
