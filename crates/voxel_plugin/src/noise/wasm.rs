//! WASM `NoiseNode`: calls the pre-compiled FastNoise2 Emscripten module
//! (built from `voxel_noise`'s `wasm_main.rs`) through a JS bridge, since
//! `voxel_noise` itself isn't a wasm32 dependency (see that crate's
//! `Cargo.toml` — its native FFI only links on non-wasm targets).

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/../voxel_noise/js/voxel_noise_bridge.js")]
extern "C" {
  #[wasm_bindgen(js_name = vx_create)]
  fn vx_create(encoded: &str) -> u32;

  #[wasm_bindgen(js_name = vx_gen_3d)]
  #[allow(clippy::too_many_arguments)]
  fn vx_gen_3d(
    handle: u32,
    x_off: f32,
    y_off: f32,
    z_off: f32,
    x_cnt: i32,
    y_cnt: i32,
    z_cnt: i32,
    x_step: f32,
    y_step: f32,
    z_step: f32,
    seed: i32,
  ) -> Float32Array;

  #[wasm_bindgen(js_name = vx_gen_2d)]
  #[allow(clippy::too_many_arguments)]
  fn vx_gen_2d(handle: u32, x_off: f32, y_off: f32, x_cnt: i32, y_cnt: i32, x_step: f32, y_step: f32, seed: i32) -> Float32Array;

  #[wasm_bindgen(js_name = vx_destroy)]
  fn vx_destroy(handle: u32);
}

/// JS-bridge-backed noise node. Not `Send`/`Sync` — JS bridge calls are
/// bound to the calling context, so the `parallel` worker-pool feature
/// falls back to main-thread generation on wasm32 (see
/// `bevy_voxel_plugin`'s `wasm_sync_mesh` feature).
pub struct NoiseNode {
  handle: u32,
}

impl NoiseNode {
  pub fn from_encoded(encoded: &str) -> Option<Self> {
    let handle = vx_create(encoded);
    if handle == 0 {
      None
    } else {
      Some(Self { handle })
    }
  }

  #[allow(clippy::too_many_arguments)]
  pub fn gen_uniform_grid_3d(
    &self,
    output: &mut [f32],
    x_off: f32,
    y_off: f32,
    z_off: f32,
    x_cnt: i32,
    y_cnt: i32,
    z_cnt: i32,
    x_step: f32,
    y_step: f32,
    z_step: f32,
    seed: i32,
  ) {
    let result = vx_gen_3d(self.handle, x_off, y_off, z_off, x_cnt, y_cnt, z_cnt, x_step, y_step, z_step, seed);
    result.copy_to(output);
  }

  #[allow(clippy::too_many_arguments)]
  pub fn gen_uniform_grid_2d(&self, output: &mut [f32], x_off: f32, y_off: f32, x_cnt: i32, y_cnt: i32, x_step: f32, y_step: f32, seed: i32) {
    let result = vx_gen_2d(self.handle, x_off, y_off, x_cnt, y_cnt, x_step, y_step, seed);
    result.copy_to(output);
  }
}

impl Drop for NoiseNode {
  fn drop(&mut self) {
    vx_destroy(self.handle);
  }
}
