//! The configuration object handed to the engine for a single job.

use serde::{Deserialize, Serialize};

use crate::error::ArgsError;
use crate::marshal::marshal;
use crate::schema::{FieldMut, FieldSlot, OptionKind, OptionSpec, Presence};

/// Declares [`SessionOptions`] together with [`OPTION_SCHEMA`].
///
/// Each entry is `switch name: Type => Kind("--flag")` or
/// `positional name: Type => Text(Required | Optional)`. Entries are emitted
/// in declaration order, so positional inputs must come last.
macro_rules! session_options {
    (@argument switch $argument:literal) => {
        Some($argument)
    };
    (@argument positional $presence:ident) => {
        None
    };
    (@presence switch $argument:literal) => {
        Presence::OmitWhenAbsent
    };
    (@presence positional Required) => {
        Presence::Required
    };
    (@presence positional Optional) => {
        Presence::OmitWhenAbsent
    };
    (
        $(
            $(#[$meta:meta])*
            $role:ident $field:ident : $ty:ty => $kind:ident ( $argument:tt )
        ),* $(,)?
    ) => {
        /// Every engine switch a caller may set for one cracking job.
        ///
        /// Numeric and boolean switches are `Option`s so that "not given" is
        /// distinct from "explicitly zero/false". Values are copied into the
        /// command line in declaration order by [`marshal`](fn@crate::marshal).
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct SessionOptions {
            $(
                $(#[$meta])*
                #[serde(skip_serializing_if = "FieldSlot::is_unset")]
                pub $field: $ty,
            )*
        }

        /// Schema rows for every [`SessionOptions`] field, in emission order.
        pub static OPTION_SCHEMA: &[OptionSpec] = &[
            $(
                OptionSpec {
                    field: stringify!($field),
                    argument: session_options!(@argument $role $argument),
                    kind: OptionKind::$kind,
                    presence: session_options!(@presence $role $argument),
                    read: |options| FieldSlot::field_ref(&options.$field),
                    write: |options| FieldSlot::field_mut(&mut options.$field),
                },
            )*
        ];
    };
}

// Skipped on purpose: version, help, quiet, status, status-timer,
// machine-readable, stdout, show, left, benchmark, speed-only,
// progress-only, opencl-info, keyspace. They change what the engine does
// rather than how a job runs.
session_options! {
    switch hash_type: Option<i64> => Integer("--hash-type"),
    switch attack_mode: Option<i64> => Integer("--attack-mode"),
    switch is_hex_charset: Option<bool> => Flag("--hex-charset"),
    switch is_hex_salt: Option<bool> => Flag("--hex-salt"),
    switch is_hex_wordlist: Option<bool> => Flag("--hex-wordlist"),
    switch keep_guessing: Option<bool> => Flag("--keep-guessing"),
    switch loopback: Option<bool> => Flag("--loopback"),
    switch weak_hash_threshold: Option<i64> => Integer("--weak-hash-threshold"),
    switch markov_hcstat: Option<String> => Text("--markov-hcstat"),
    switch disable_markov: Option<bool> => Flag("--markov-disable"),
    switch enable_classic_markov: Option<bool> => Flag("--markov-classic"),
    switch markov_threshold: Option<i64> => Integer("--markov-threshold"),
    switch force: Option<bool> => Flag("--force"),
    /// Abort the session after this many seconds.
    switch max_runtime_seconds: Option<i64> => Integer("--runtime"),
    switch session_name: Option<String> => Text("--session"),
    switch restore_session: Option<bool> => Flag("--restore"),
    switch disable_restore: Option<bool> => Flag("--restore-disable"),
    switch restore_file_path: Option<String> => Text("--restore-file-path"),
    switch outfile_path: Option<String> => Text("--outfile"),
    switch outfile_format: Option<i64> => Integer("--outfile-format"),
    switch outfile_disable_auto_hex: Option<bool> => Flag("--outfile-autohex-disable"),
    switch outfile_check_timer: Option<i64> => Integer("--outfile-check-timer"),
    switch separator: Option<String> => Text("--separator"),
    /// Ignore usernames in the hash file.
    switch ignore_username: Option<bool> => Flag("--username"),
    switch remove_cracked_hash: Option<bool> => Flag("--remove"),
    switch remove_cracked_hash_timer: Option<i64> => Integer("--remove-timer"),
    switch potfile_disable: Option<bool> => Flag("--potfile-disable"),
    switch potfile_path: Option<String> => Text("--potfile-path"),
    switch encoding_from: Option<String> => Text("--encoding-from"),
    switch encoding_to: Option<String> => Text("--encoding-to"),
    switch debug_mode: Option<i64> => Integer("--debug-mode"),
    switch debug_file: Option<String> => Text("--debug-file"),
    switch induction_dir: Option<String> => Text("--induction-dir"),
    switch logfile_disable: Option<bool> => Flag("--logfile-disable"),
    switch hccapx_message_pair: Option<String> => Text("--hccapx-message-pair"),
    switch nonce_error_corrections: Option<i64> => Integer("--nonce-error-corrections"),
    switch truecrypt_keyfiles: Option<String> => Text("--truecrypt-keyfiles"),
    switch veracrypt_keyfiles: Option<String> => Text("--veracrypt-keyfiles"),
    switch veracrypt_pim: Option<i64> => Integer("--veracrypt-pim"),
    switch veracrypt_pim_start: Option<i64> => Integer("--veracrypt-pim-start"),
    switch veracrypt_pim_stop: Option<i64> => Integer("--veracrypt-pim-stop"),
    switch segment_size: Option<i64> => Integer("--segment-size"),
    switch bitmap_min: Option<i64> => Integer("--bitmap-min"),
    switch bitmap_max: Option<i64> => Integer("--bitmap-max"),
    switch cpu_affinity: Option<String> => Text("--cpu-affinity"),
    switch hook_threads: Option<i64> => Integer("--hook-threads"),
    switch backend_ignore_cuda: Option<bool> => Flag("--backend-ignore-cuda"),
    switch backend_ignore_opencl: Option<bool> => Flag("--backend-ignore-opencl"),
    switch backend_devices: Option<String> => Text("--backend-devices"),
    switch opencl_device_types: Option<String> => Text("--opencl-device-types"),
    switch optimized_kernel_enabled: Option<bool> => Flag("--optimized-kernel-enable"),
    switch workload_profile: Option<i64> => Integer("--workload-profile"),
    switch kernel_accel: Option<i64> => Integer("--kernel-accel"),
    switch kernel_loops: Option<i64> => Integer("--kernel-loops"),
    switch spin_damp: Option<i64> => Integer("--spin-damp"),
    switch hw_monitor_disable: Option<bool> => Flag("--hwmon-disable"),
    switch hw_monitor_temp_abort: Option<i64> => Integer("--hwmon-temp-abort"),
    switch scrypt_tmto: Option<i64> => Integer("--scrypt-tmto"),
    switch skip: Option<i64> => Integer("--skip"),
    switch limit: Option<i64> => Integer("--limit"),
    switch rule_left: Option<String> => Text("--rule-left"),
    switch rule_right: Option<String> => Text("--rule-right"),
    switch rules_file: Option<String> => Text("--rules-file"),
    switch generate_rules: Option<i64> => Integer("--generate-rules"),
    switch generate_rules_func_min: Option<i64> => Integer("--generate-rules-func-min"),
    switch generate_rules_func_max: Option<i64> => Integer("--generate-rules-func-max"),
    switch generate_rules_seed: Option<i64> => Integer("--generate-rules-seed"),
    switch custom_charset1: Option<String> => Text("--custom-charset1"),
    switch custom_charset2: Option<String> => Text("--custom-charset2"),
    switch custom_charset3: Option<String> => Text("--custom-charset3"),
    switch custom_charset4: Option<String> => Text("--custom-charset4"),
    switch increment_mask: Option<bool> => Flag("--increment"),
    switch increment_mask_min: Option<i64> => Integer("--increment-min"),
    switch increment_mask_max: Option<i64> => Integer("--increment-max"),
    switch identify: Option<bool> => Flag("--identify"),
    switch enable_deprecated: Option<bool> => Flag("--deprecated-check-disable"),

    /// A single hash, or a path to a hash file or hccapx capture.
    positional input_file: String => Text(Required),
    /// Dictionary, mask or directory, depending on the attack mode.
    positional dictionary_mask_directory_input: Option<String> => Text(Optional),
}

impl SessionOptions {
    /// Shorthand for [`marshal`] with the shipped schema.
    pub fn to_args(&self) -> Result<Vec<String>, ArgsError> {
        marshal(self)
    }

    /// Canonical form of these options as seen through the command line.
    ///
    /// Flags set to `false` and empty strings produce no argv tokens, so they
    /// come back from [`parse`](fn@crate::parse) as absent. Everything else is
    /// left untouched.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        for spec in OPTION_SCHEMA {
            match (spec.write)(&mut normalized) {
                FieldMut::Flag(slot) => {
                    if *slot == Some(false) {
                        *slot = None;
                    }
                }
                FieldMut::Text(slot) => {
                    if slot.as_deref() == Some("") {
                        *slot = None;
                    }
                }
                FieldMut::Integer(_) | FieldMut::Required(_) => {}
            }
        }
        normalized
    }
}
