use super::{Tool, ToolContext, ToolError, decode_args};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Create or fully overwrite a file. Registered as both `write-file` and
/// `edit-file`.
pub struct WriteFile {
    name: &'static str,
}

impl WriteFile {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[derive(Debug, Deserialize)]
struct WriteFileArgs {
    file: String,
    content: String,
}

#[async_trait]
impl Tool for WriteFile {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn call(&self, args: Map<String, Value>, ctx: ToolContext<'_>) -> Result<String, ToolError> {
        let args: WriteFileArgs = decode_args(args)?;
        let path = ctx.workspace.resolve_file(&args.file)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ToolError::io(format!("failed to create directory for '{}'", args.file), e))?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o644);

        let mut file = options
            .open(&path)
            .await
            .map_err(|e| ToolError::io(format!("error writing file '{}'", args.file), e))?;
        file.write_all(args.content.as_bytes())
            .await
            .map_err(|e| ToolError::io(format!("error writing file '{}'", args.file), e))?;
        file.flush()
            .await
            .map_err(|e| ToolError::io(format!("error writing file '{}'", args.file), e))?;

        tracing::debug!(file = %args.file, bytes = args.content.len(), "file written");
        Ok(String::new())
    }
}

/// `read-file`: return the whole file as text.
pub struct ReadFile;

#[derive(Debug, Deserialize)]
struct ReadFileArgs {
    file: String,
}

#[async_trait]
impl Tool for ReadFile {
    fn name(&self) -> &'static str {
        "read-file"
    }

    async fn call(&self, args: Map<String, Value>, ctx: ToolContext<'_>) -> Result<String, ToolError> {
        let args: ReadFileArgs = decode_args(args)?;
        let path = ctx.workspace.resolve_file(&args.file)?;

        fs::read_to_string(&path)
            .await
            .map_err(|e| ToolError::io(format!("error reading file '{}'", args.file), e))
    }
}

/// `list-files`: entry names of one directory, sorted, one per line.
pub struct ListFiles;

#[derive(Debug, Deserialize)]
struct ListFilesArgs {
    #[serde(default)]
    working_directory: Option<String>,
}

#[async_trait]
impl Tool for ListFiles {
    fn name(&self) -> &'static str {
        "list-files"
    }

    async fn call(&self, args: Map<String, Value>, ctx: ToolContext<'_>) -> Result<String, ToolError> {
        let args: ListFilesArgs = decode_args(args)?;
        let dir = ctx.workspace.resolve_dir(args.working_directory.as_deref())?;

        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| ToolError::io("error listing files", e))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ToolError::io("error listing files", e))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        Ok(names.join("\n"))
    }
}
