//! FFT-based convolution against a fixed real kernel
//!
//! One forward FFT, a frequency-domain product and one inverse FFT per call;
//! the kernel spectrum and both plans are prepared once and reused for every
//! frequency row of the time-frequency map.

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::Arc;

/// Convolver for complex signals of fixed length against a fixed real kernel.
pub struct KernelConvolver {
    /// FFT size (power of 2, >= signal_len + kernel_len - 1)
    fft_size: usize,

    signal_len: usize,
    kernel_len: usize,

    fft: Arc<dyn rustfft::Fft<f64>>,
    ifft: Arc<dyn rustfft::Fft<f64>>,

    /// Kernel in the frequency domain
    kernel_fft: Vec<Complex<f64>>,

    /// Reusable work buffer
    buffer: Vec<Complex<f64>>,
}

impl KernelConvolver {
    /// Plan the FFTs and transform the kernel.
    pub fn new(signal_len: usize, kernel: &[f64]) -> Self {
        let kernel_len = kernel.len();
        let fft_size = (signal_len + kernel_len - 1).next_power_of_two();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let ifft = planner.plan_fft_inverse(fft_size);

        let mut kernel_fft = vec![Complex::new(0.0, 0.0); fft_size];
        for (i, &k) in kernel.iter().enumerate() {
            kernel_fft[i] = Complex::new(k, 0.0);
        }
        fft.process(&mut kernel_fft);

        let buffer = vec![Complex::new(0.0, 0.0); fft_size];

        Self {
            fft_size,
            signal_len,
            kernel_len,
            fft,
            ifft,
            kernel_fft,
            buffer,
        }
    }

    /// Linear convolution, trimmed to the "same" alignment: the output has
    /// the signal's length and the kernel center rides over each sample.
    pub fn convolve(&mut self, signal: &[Complex<f64>]) -> Vec<Complex<f64>> {
        debug_assert_eq!(signal.len(), self.signal_len);

        self.buffer[..self.signal_len].copy_from_slice(signal);
        self.buffer[self.signal_len..].fill(Complex::new(0.0, 0.0));

        self.fft.process(&mut self.buffer);
        for (b, k) in self.buffer.iter_mut().zip(&self.kernel_fft) {
            *b *= k;
        }
        self.ifft.process(&mut self.buffer);

        let scale = 1.0 / self.fft_size as f64;
        let start = (self.kernel_len - 1) / 2;
        self.buffer[start..start + self.signal_len]
            .iter()
            .map(|c| c * scale)
            .collect()
    }
}
