//! Forward/backward handoff through an opaque context handle.
//!
//! Run with: RUST_LOG=debug cargo run -p signatory-diff --example forward_backward
//!
//! This example walks one call through the layer:
//! - argument checks on an externally laid out path
//! - building a SigSpec in the internal layout
//! - saving per-degree views behind a handle
//! - taking the context back for the backward pass
//!
//! The signature values are placeholders; computing them is the job of the
//! forward engine that sits on top of this layer.

use ndarray::{Array, Axis};
use signatory_core::{
    checkargs, checkargs_backward, layout, logsignature_channels, slice_at_stream, slice_by_term,
    SigSpec, SignatureOptions,
};
use signatory_diff::{get_context, make_context, take_context, LogSignatureData};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Signature forward/backward handoff ===\n");

    // -------------------------------------------------------------------------
    // 1. Check arguments in the external (batch, stream, channel) layout
    // -------------------------------------------------------------------------
    let options: SignatureOptions =
        match parse_options(r#"{ "depth": 3, "stream": true, "mode": "words" }"#) {
            Some(options) => options,
            None => return,
        };
    let path = Array::from_shape_fn((2, 5, 3), |(b, s, c)| (b + s * c) as f64).into_dyn();
    if let Err(err) = checkargs(path.view(), options.depth, options.basepoint, None) {
        eprintln!("rejected: {}", err);
        return;
    }
    println!("1. path {:?} accepted at depth {}", path.shape(), options.depth);

    // -------------------------------------------------------------------------
    // 2. Derive the spec in the internal (stream, channel, batch) layout
    // -------------------------------------------------------------------------
    let internal = layout::path_to_internal(path.view());
    let spec = SigSpec::new(&internal, options.depth, options.stream, options.basepoint);
    println!(
        "2. output: {} stream positions x {} channels, reciprocals {:?}",
        spec.output_stream_size(),
        spec.output_channels(),
        spec.reciprocals().to_vec()
    );

    // -------------------------------------------------------------------------
    // 3. Forward: slice the output by degree and save it
    // -------------------------------------------------------------------------
    let out = Array::<f64, _>::zeros((
        spec.output_stream_size(),
        spec.output_channels(),
        spec.batch_size(),
    ))
    .into_dyn()
    .into_shared();
    let mut out_vector = Vec::new();
    slice_by_term(&out, &mut out_vector, Axis(1), &spec);
    for (k, term) in out_vector.iter().enumerate() {
        println!("   degree {} block: {:?}", k + 1, term.shape());
    }
    let increments = Array::<f64, _>::zeros((
        spec.output_stream_size(),
        spec.input_channels(),
        spec.batch_size(),
    ))
    .into_dyn()
    .into_shared();

    let channels = logsignature_channels(spec.input_channels(), spec.depth(), options.mode);
    let signature_vector = out_vector.clone();
    let mut handle = make_context(out_vector, out, increments, spec);
    if let Ok(context) = get_context::<f64>(&mut handle) {
        context.set_logsignature_data(LogSignatureData {
            signature_vector,
            transforms: vec![(1, 1, 2)],
            mode: options.mode,
            logsignature_channels: channels,
        });
    }
    println!("3. saved context behind {:?}", handle);

    // -------------------------------------------------------------------------
    // 4. Backward: take the context back and check the gradient
    // -------------------------------------------------------------------------
    let context = match take_context::<f64>(handle) {
        Ok(context) => context,
        Err(err) => {
            eprintln!("backward failed: {}", err);
            return;
        }
    };
    let spec = context.sigspec();
    let grad =
        Array::<f64, _>::ones((spec.batch_size(), spec.output_stream_size(), channels)).into_dyn();
    match checkargs_backward(grad.view(), spec, context.logsignature_channels()) {
        Ok(()) => println!(
            "4. gradient {:?} accepted ({} log-signature channels)",
            grad.shape(),
            channels
        ),
        Err(err) => println!("4. gradient rejected: {}", err),
    }

    let mut at_end = Vec::new();
    slice_at_stream(context.out_vector(), &mut at_end, spec.output_stream_size() - 1);
    println!(
        "   last stream position, per degree: {:?}",
        at_end.iter().map(|t| t.shape().to_vec()).collect::<Vec<_>>()
    );
}

fn parse_options(json: &str) -> Option<SignatureOptions> {
    match serde_json::from_str::<SignatureOptions>(json) {
        Ok(options) => options.validate().ok().map(|_| options),
        Err(err) => {
            eprintln!("bad options: {}", err);
            None
        }
    }
}
