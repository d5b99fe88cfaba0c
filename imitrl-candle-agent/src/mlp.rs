//! Multilayer perceptron.
mod base;
mod config;
mod mlp2;
use anyhow::Result;
pub use base::Mlp;
use candle_core::Tensor;
use candle_nn::{linear, Linear, Module, VarBuilder};
pub use config::MlpConfig;
pub use mlp2::Mlp2;

/// Returns linear layers mapping `in_dim` through `units`.
///
/// If `out_dim` is given, a final layer from the last unit to `out_dim` is appended.
fn create_linear_layers(
    prefix: &str,
    vs: VarBuilder,
    in_dim: i64,
    units: &[i64],
    out_dim: Option<i64>,
) -> Result<Vec<Linear>> {
    let mut dims = vec![in_dim];
    dims.extend_from_slice(units);
    if let Some(out_dim) = out_dim {
        dims.push(out_dim);
    }
    let vs = vs.pp(prefix);

    dims.windows(2)
        .enumerate()
        .map(|(i, w)| -> Result<Linear> {
            Ok(linear(w[0] as _, w[1] as _, vs.pp(format!("ln{}", i)))?)
        })
        .collect()
}

/// Applies the layers with ReLU in between.
///
/// The output of the final layer goes through ReLU only if `activation_out` is `true`.
fn mlp_forward(xs: &Tensor, layers: &[Linear], activation_out: bool) -> Result<Tensor> {
    let n_layers = layers.len();
    let mut xs = xs.clone();

    for (i, layer) in layers.iter().enumerate() {
        xs = layer.forward(&xs)?;
        if i + 1 < n_layers || activation_out {
            xs = xs.relu()?;
        }
    }

    Ok(xs)
}
