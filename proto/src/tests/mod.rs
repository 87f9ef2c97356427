mod task_def_codec_tests;
mod unknown_field_tests;
