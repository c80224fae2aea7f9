//! Recipe model, patching and persistence

pub mod io;
pub mod patcher;
pub mod types;

pub use io::{
    load_recipe, parse_recipe, serialize_recipe, write_recipe, write_temp_recipe, TempRecipe,
};
pub use patcher::{
    find_action_index, patch_upload_step, PatchOutcome, UploadArtifacts, APPLICATION_FILENAME,
    TEST_FILENAME, UPLOAD_FILE_ACTION,
};
pub use types::{Recipe, Step};
