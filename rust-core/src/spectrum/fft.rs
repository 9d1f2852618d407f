//! Radix-2 FFT engine
//!
//! Iterative decimation-in-time Cooley-Tukey: bit-reversal permutation
//! followed by log2(N) butterfly passes over a single buffer.
//!
//! # Length contract
//! Inputs whose length M is not a power of two are zero-padded on the right
//! to N = 2^ceil(log2 M). The spectrum always has length N, never M. Callers
//! that need exactly M samples back must truncate the inverse transform
//! themselves. Inputs of length 0 or 1 are returned unchanged.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Transform length used for an input of `len` samples
pub fn padded_len(len: usize) -> usize {
    if len <= 1 {
        len
    } else {
        len.next_power_of_two()
    }
}

/// Precomputed plan for a fixed power-of-two transform size
///
/// Holds no scratch state, so one engine can be shared by reference
/// across worker threads.
#[derive(Debug, Clone)]
pub struct FftEngine {
    /// Transform size N (power of two)
    size: usize,

    /// bit_reverse[i] = index i with its log2(N) low bits reversed
    bit_reverse: Vec<usize>,

    /// W_N^k = exp(-j*2*pi*k/N) for k = 0..N/2
    twiddles: Vec<Complex64>,
}

impl FftEngine {
    /// Plan a transform for inputs of `len` samples
    ///
    /// # Arguments
    /// * `len` - Input length in samples (rounded up to a power of two)
    pub fn new(len: usize) -> Self {
        let size = padded_len(len).max(1);
        let bits = size.trailing_zeros();

        let bit_reverse = (0..size)
            .map(|i| {
                if bits == 0 {
                    i
                } else {
                    i.reverse_bits() >> (usize::BITS - bits)
                }
            })
            .collect();

        let twiddles = (0..size / 2)
            .map(|k| Complex64::from_polar(1.0, -2.0 * PI * k as f64 / size as f64))
            .collect();

        Self {
            size,
            bit_reverse,
            twiddles,
        }
    }

    /// Transform size N
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform in place
    ///
    /// # Panics
    /// If `buffer.len()` differs from `self.size()`.
    pub fn forward(&self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.size, "buffer length must match plan size");
        let n = self.size;

        for i in 0..n {
            let j = self.bit_reverse[i];
            if i < j {
                buffer.swap(i, j);
            }
        }

        // Butterfly passes: each pass merges pairs of half-length spectra
        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for block in buffer.chunks_exact_mut(len) {
                let (even, odd) = block.split_at_mut(half);
                for k in 0..half {
                    let t = self.twiddles[k * stride] * odd[k];
                    let e = even[k];
                    even[k] = e + t;
                    odd[k] = e - t;
                }
            }
            len <<= 1;
        }
    }

    /// Inverse transform in place: conj(FFT(conj(X))) / N
    ///
    /// # Panics
    /// If `buffer.len()` differs from `self.size()`.
    pub fn inverse(&self, buffer: &mut [Complex64]) {
        buffer.iter_mut().for_each(|c| *c = c.conj());
        self.forward(buffer);

        let scale = 1.0 / self.size as f64;
        buffer.iter_mut().for_each(|c| *c = c.conj() * scale);
    }
}

/// Forward transform of a complex sequence (see module docs for padding)
pub fn forward_transform(input: &[Complex64]) -> Vec<Complex64> {
    if input.len() <= 1 {
        return input.to_vec();
    }

    let engine = FftEngine::new(input.len());
    let mut buffer = input.to_vec();
    buffer.resize(engine.size(), Complex64::new(0.0, 0.0));
    engine.forward(&mut buffer);
    buffer
}

/// Forward transform of a real sequence (see module docs for padding)
pub fn forward_transform_real(samples: &[f64]) -> Vec<Complex64> {
    let complex: Vec<Complex64> = samples.iter().map(|&s| Complex64::new(s, 0.0)).collect();
    forward_transform(&complex)
}

/// Inverse transform
///
/// Returns a complex sequence of the padded length. A non-power-of-two
/// spectrum is a caller error; it is padded like a forward input.
pub fn inverse_transform(spectrum: &[Complex64]) -> Vec<Complex64> {
    if spectrum.len() <= 1 {
        return spectrum.to_vec();
    }

    let engine = FftEngine::new(spectrum.len());
    let mut buffer = spectrum.to_vec();
    buffer.resize(engine.size(), Complex64::new(0.0, 0.0));
    engine.inverse(&mut buffer);
    buffer
}

/// Inverse transform keeping only the real part
///
/// For spectra of real signals the discarded imaginary part is rounding noise.
pub fn inverse_transform_real(spectrum: &[Complex64]) -> Vec<f64> {
    inverse_transform(spectrum).iter().map(|c| c.re).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    fn naive_dft(x: &[Complex64]) -> Vec<Complex64> {
        let n = x.len();
        (0..n)
            .map(|k| {
                x.iter()
                    .enumerate()
                    .map(|(t, &v)| {
                        v * Complex64::from_polar(1.0, -2.0 * PI * (k * t) as f64 / n as f64)
                    })
                    .sum::<Complex64>()
            })
            .collect()
    }

    fn recursive_fft(x: &[Complex64]) -> Vec<Complex64> {
        let n = x.len();
        if n <= 1 {
            return x.to_vec();
        }
        let even: Vec<Complex64> = x.iter().step_by(2).copied().collect();
        let odd: Vec<Complex64> = x.iter().skip(1).step_by(2).copied().collect();
        let (even, odd) = (recursive_fft(&even), recursive_fft(&odd));

        let mut out = vec![Complex64::new(0.0, 0.0); n];
        for k in 0..n / 2 {
            let t = Complex64::from_polar(1.0, -2.0 * PI * k as f64 / n as f64) * odd[k];
            out[k] = even[k] + t;
            out[k + n / 2] = even[k] - t;
        }
        out
    }

    fn max_error(a: &[Complex64], b: &[Complex64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_impulse_gives_flat_spectrum() {
        let mut x = vec![0.0; 8];
        x[0] = 1.0;

        let spectrum = forward_transform_real(&x);

        assert_eq!(spectrum.len(), 8);
        for bin in &spectrum {
            assert!((bin - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_dc_signal() {
        let spectrum = forward_transform_real(&vec![1.0; 64]);

        assert!((spectrum[0].re - 64.0).abs() < 1e-9);
        assert!(spectrum[1..].iter().all(|c| c.norm() < 1e-9));
    }

    #[test]
    fn test_sine_peak_bin() {
        let n = 1024;
        let bin = 37;
        let signal: Vec<f64> = (0..n)
            .map(|t| (2.0 * PI * bin as f64 * t as f64 / n as f64).sin())
            .collect();

        let spectrum = forward_transform_real(&signal);
        let (peak_bin, _) = spectrum[..n / 2]
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
            .unwrap();

        assert_eq!(peak_bin, bin);
        // Pure sine: N/2 magnitude at its bin
        assert!((spectrum[bin].norm() - n as f64 / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_matches_naive_dft_after_padding() {
        let x: Vec<Complex64> = (0..12)
            .map(|i| Complex64::new((i as f64 * 0.7).sin(), (i as f64 * 0.3).cos()))
            .collect();

        let spectrum = forward_transform(&x);
        assert_eq!(spectrum.len(), 16);

        let mut padded = x.clone();
        padded.resize(16, Complex64::new(0.0, 0.0));
        assert!(max_error(&spectrum, &naive_dft(&padded)) < 1e-9);
    }

    #[test]
    fn test_matches_recursive_definition() {
        let x: Vec<Complex64> = (0..512)
            .map(|i| Complex64::new(((i * 31 % 17) as f64 - 8.0) / 8.0, (i as f64 * 0.2).sin()))
            .collect();

        assert!(max_error(&forward_transform(&x), &recursive_fft(&x)) < 1e-10);
    }

    #[test]
    fn test_matches_rustfft() {
        let n = 2048;
        let x: Vec<Complex64> = (0..n)
            .map(|i| Complex64::new((i as f64 * 0.013).sin() + 0.25, (i as f64 * 0.05).cos()))
            .collect();

        let mut reference = x.clone();
        FftPlanner::<f64>::new()
            .plan_fft_forward(n)
            .process(&mut reference);

        assert!(max_error(&forward_transform(&x), &reference) < 1e-8);
    }

    #[test]
    fn test_trivial_lengths_are_identity() {
        assert!(forward_transform(&[]).is_empty());
        assert!(inverse_transform(&[]).is_empty());

        let single = [Complex64::new(3.5, -1.0)];
        assert_eq!(forward_transform(&single), single.to_vec());
        assert_eq!(inverse_transform(&single), single.to_vec());
    }

    #[test]
    fn test_output_length_is_padded_length() {
        for (m, n) in [(2, 2), (3, 4), (5, 8), (1000, 1024), (1025, 2048)] {
            assert_eq!(padded_len(m), n);
            assert_eq!(forward_transform_real(&vec![0.5; m]).len(), n);
        }
    }

    #[test]
    fn test_round_trip_reconstructs_padded_signal() {
        let x: Vec<f64> = (0..300).map(|i| (i as f64 * 0.1).sin() * 0.8).collect();

        let restored = inverse_transform_real(&forward_transform_real(&x));

        assert_eq!(restored.len(), 512);
        for (i, &value) in restored.iter().enumerate() {
            let expected = x.get(i).copied().unwrap_or(0.0);
            assert!((value - expected).abs() < 1e-9, "sample {}: {} vs {}", i, value, expected);
        }
    }

    #[test]
    fn test_real_input_has_negligible_imaginary_residue() {
        let x: Vec<f64> = (0..256).map(|i| ((i * 7 % 13) as f64 - 6.0) / 6.0).collect();

        let restored = inverse_transform(&forward_transform_real(&x));
        assert!(restored.iter().all(|c| c.im.abs() < 1e-12));
    }

    #[test]
    fn test_linearity() {
        let x: Vec<f64> = (0..128).map(|i| (i as f64 * 0.2).sin()).collect();
        let y: Vec<f64> = (0..128).map(|i| (i as f64 * 0.05).cos()).collect();
        let (a, b) = (2.5, -0.75);

        let combined: Vec<f64> = x.iter().zip(&y).map(|(&p, &q)| a * p + b * q).collect();
        let lhs = forward_transform_real(&combined);
        let rhs: Vec<Complex64> = forward_transform_real(&x)
            .iter()
            .zip(forward_transform_real(&y))
            .map(|(&p, q)| p * a + q * b)
            .collect();

        assert!(max_error(&lhs, &rhs) < 1e-9);
    }

    #[test]
    fn test_nan_propagates() {
        let mut x = vec![0.0; 8];
        x[3] = f64::NAN;

        let spectrum = forward_transform_real(&x);
        assert!(spectrum.iter().all(|c| c.re.is_nan() || c.im.is_nan()));
    }

    #[test]
    #[should_panic(expected = "buffer length must match plan size")]
    fn test_engine_rejects_short_buffer() {
        let engine = FftEngine::new(16);
        let mut buffer = vec![Complex64::new(1.0, 0.0); 8];
        engine.forward(&mut buffer);
    }

    #[test]
    #[should_panic(expected = "buffer length must match plan size")]
    fn test_engine_rejects_long_buffer() {
        let engine = FftEngine::new(16);
        let mut buffer = vec![Complex64::new(1.0, 0.0); 32];
        engine.inverse(&mut buffer);
    }

    #[test]
    fn test_engine_reuse() {
        let engine = FftEngine::new(16);
        assert_eq!(engine.size(), 16);

        let original: Vec<Complex64> = (0..16).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let mut buffer = original.clone();
        engine.forward(&mut buffer);
        engine.inverse(&mut buffer);

        assert!(max_error(&buffer, &original) < 1e-12);
    }
}
