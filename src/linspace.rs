/// Iterator over `n` evenly spaced samples of `[min, max]`, endpoints
/// included. Mirrors `numpy.linspace`.
pub struct Linspace {
    start: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 {
            let num_steps = (n - 1) as f64;
            (max - min) / num_steps
        } else {
            0.
        };
        Linspace {
            start: min,
            step,
            index: 0,
            len: n,
        }
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            // Calculate the value just like numpy.linspace does
            let i = self.index;
            self.index += 1;
            Some(self.start + self.step * i as f64)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

#[test]
fn test_linspace_endpoints() {
    let samples: Vec<f64> = Linspace::new(0., 10., 5).collect();

    assert_eq!(samples, vec![0., 2.5, 5., 7.5, 10.]);

    let single: Vec<f64> = Linspace::new(3., 9., 1).collect();

    assert_eq!(single, vec![3.]);
}
