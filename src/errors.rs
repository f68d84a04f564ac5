use error_set::error_set;

error_set!{
    MergeError = ParseError || WriteError;
    ParseError = {
        #[display("Failed to read {path}: {reason}")]
        Read{path: String, reason: String},
        #[display("Invalid JSON in {path}: {reason}")]
        InvalidJson{path: String, reason: String},
        #[display("No `vectors` array in {path}")]
        MissingVectors{path: String},
        #[display("Record {index} in {path} has no `protocol_name`")]
        MissingProtocolName{path: String, index: usize},
        #[display("Record {index} in {path} has a non-string `protocol_name`: {value}")]
        InvalidProtocolName{path: String, index: usize, value: String},
        #[display("Record {index} in {path} has no `name`")]
        MissingName{path: String, index: usize},
        #[display("Record {index} in {path} has a non-string `name`: {value}")]
        InvalidName{path: String, index: usize, value: String},
    };
    WriteError = {
        #[display("Failed to serialize vectors for {path}: {reason}")]
        Serialize{path: String, reason: String},
        #[display("Failed to write {path}: {reason}")]
        Io{path: String, reason: String},
    };
}
