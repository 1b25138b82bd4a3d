//! Command handlers module
//!
//! Maps a latched command, together with the session it arrived on, to
//! the replies it produces and the `CommandStatus` the state machine acts
//! on. Handlers never wait: a command that needs the data connection
//! returns `CommandStatus::Reinvoke` until `DataChannel::ready` settles.

use log::{debug, info, warn};
use std::net::Ipv4Addr;
use std::time::{Instant, SystemTime};

use crate::auth::{validate_password, validate_user};
use crate::client::{ControlState, Session};
use crate::error::StorageError;
use crate::error::handlers::storage_error_code;
use crate::navigate::{file_name, parent_path, resolve_path};
use crate::net::{Connector, Listener};
use crate::protocol::commands::{Command, CommandStatus, FtpCommand};
use crate::protocol::responses::*;
use crate::server::config::SessionSettings;
use crate::storage::{FileHandle, FileSystem, ListingFormat, format_timestamp, render_listing};
use crate::transfer::{
    DataChannel, DataMode, DataReady, TransferBuffer, TransferContext, abort_transfer,
};
use crate::utils::{format_pasv_address, parse_port_argument};

/// Everything a handler may touch while serving one command.
pub struct DispatchContext<'a, L, C, F>
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    pub session: &'a mut Session,
    pub data: &'a mut DataChannel<L, C>,
    pub transfer: &'a mut Option<TransferContext<F::File>>,
    pub fs: &'a mut F,
    pub replies: &'a mut Replies,
    pub settings: &'a SessionSettings,
    /// Local address of the control connection, used by PASV.
    pub local_ip: Option<Ipv4Addr>,
    pub now: Instant,
}

/// Whether `code` may be processed in login phase `state`.
///
/// FEAT is always accepted so clients can ask for features before login.
pub fn accepted_in(state: ControlState, code: FtpCommand) -> bool {
    match state {
        ControlState::AwaitingUser => matches!(code, FtpCommand::User | FtpCommand::Feat),
        ControlState::AwaitingPassword => matches!(code, FtpCommand::Pass | FtpCommand::Feat),
        _ => true,
    }
}

/// Dispatches a received FTP command to its corresponding handler.
///
/// # Arguments
///
/// * `ctx` - The session and the collaborators the command may use.
/// * `command` - The latched command; CWD may rewrite it in place.
///
/// # Returns
///
/// * `CommandStatus` - `Reinvoke` keeps the command latched for the next
///   poll, anything else retires it.
pub fn handle_command<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    command: &mut Command,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    if !accepted_in(ctx.session.state(), command.code) {
        debug!("Ignoring before login: {}", command);
        ctx.replies.send(NOT_LOGGED_IN, "Please login with USER and PASS.");
        return CommandStatus::Failure("not logged in".into());
    }

    // A rename source only survives until the very next command.
    let rename_from = ctx.session.take_rename_from();
    let path = resolve_path(ctx.session.cwd(), &command.params, true);

    match command.code {
        FtpCommand::User => handle_cmd_user(ctx, &command.params),
        FtpCommand::Pass => handle_cmd_pass(ctx, &command.params),
        FtpCommand::Quit => handle_cmd_quit(ctx),
        FtpCommand::Noop => {
            ctx.replies.send(OK, "Zzz...");
            CommandStatus::Success
        }
        FtpCommand::Cdup => handle_cmd_cdup(ctx),
        FtpCommand::Cwd => handle_cmd_cwd(ctx, command, path),
        FtpCommand::Pwd => {
            let reply = format!("\"{}\" is the current directory.", ctx.session.cwd());
            ctx.replies.send(PATH_CREATED, &reply);
            CommandStatus::Success
        }
        FtpCommand::Mode => handle_cmd_mode(ctx, &command.params),
        FtpCommand::Stru => handle_cmd_stru(ctx, &command.params),
        FtpCommand::Type => handle_cmd_type(ctx, &command.params),
        FtpCommand::Pasv => handle_cmd_pasv(ctx),
        FtpCommand::Port => handle_cmd_port(ctx, &command.params),
        FtpCommand::Abor => {
            abort_transfer(ctx.transfer, ctx.data, ctx.replies);
            ctx.data.close();
            ctx.replies.send(TRANSFER_COMPLETE, "Data connection closed");
            CommandStatus::Success
        }
        FtpCommand::Dele => handle_cmd_dele(ctx, &command.params, &path),
        FtpCommand::List | FtpCommand::Mlsd | FtpCommand::Nlst => {
            handle_cmd_listing(ctx, command)
        }
        FtpCommand::Retr => handle_cmd_retr(ctx, &command.params, &path),
        FtpCommand::Stor => handle_cmd_stor(ctx, &command.params, &path),
        FtpCommand::Mkd => handle_cmd_mkd(ctx, &path),
        FtpCommand::Rmd => handle_cmd_rmd(ctx, &path),
        FtpCommand::Rnfr => handle_cmd_rnfr(ctx, &command.params, path),
        FtpCommand::Rnto => handle_cmd_rnto(ctx, &command.params, &path, rename_from),
        FtpCommand::Feat => {
            ctx.replies.send_continued(FEATURES, "Features:");
            ctx.replies.send_raw(" MLSD");
            ctx.replies.send_raw(" MDTM");
            ctx.replies.send_raw(" SIZE");
            ctx.replies.send(FEATURES, "End.");
            CommandStatus::Success
        }
        FtpCommand::Mdtm => handle_cmd_mdtm(ctx, &command.params, &path),
        FtpCommand::Size => handle_cmd_size(ctx, &command.params, &path),
        FtpCommand::Site => {
            ctx.replies.send(NOT_IMPLEMENTED, "SITE command not implemented");
            CommandStatus::Failure("SITE".into())
        }
        FtpCommand::Syst => {
            ctx.replies.send(SYSTEM_TYPE, "UNIX Type: L8");
            CommandStatus::Success
        }
        FtpCommand::Unknown => {
            debug!("Unknown command: {}", command);
            let reply = format!("unknown command \"{}\"", command.token);
            ctx.replies.send(UNKNOWN_COMMAND, &reply);
            CommandStatus::Failure(format!("unknown command {}", command.token))
        }
    }
}

/// Answers 501 for commands that need a file name and got none.
fn missing_file_name(replies: &mut Replies, params: &str) -> Option<CommandStatus> {
    if params.is_empty() {
        replies.send(BAD_PARAMETERS, "No file name");
        return Some(CommandStatus::Failure("no file name".into()));
    }
    None
}

/// Handles USER. State advancement is left to the session state machine.
fn handle_cmd_user<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>, username: &str) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    if ctx.session.state().is_authenticated() {
        ctx.replies.send(LOGIN_SUCCESS, "Already logged in.");
        return CommandStatus::Success;
    }
    match validate_user(ctx.session.credentials(), username) {
        Ok(()) => {
            info!("User '{}' accepted", username);
            CommandStatus::Success
        }
        Err(e) => {
            warn!("Login refused: {}", e);
            ctx.replies.send(INVALID_CREDENTIALS, "User not found.");
            CommandStatus::Failure(e.to_string())
        }
    }
}

fn handle_cmd_pass<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>, password: &str) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    if ctx.session.state().is_authenticated() {
        ctx.replies.send(LOGIN_SUCCESS, "Already logged in.");
        return CommandStatus::Success;
    }
    match validate_password(ctx.session.credentials(), password) {
        Ok(()) => CommandStatus::Success,
        Err(e) => {
            warn!("Login refused: {}", e);
            ctx.replies.send(INVALID_CREDENTIALS, "Password invalid.");
            CommandStatus::Failure(e.to_string())
        }
    }
}

/// Handles QUIT: ends any transfer and signals connection close.
fn handle_cmd_quit<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    abort_transfer(ctx.transfer, ctx.data, ctx.replies);
    ctx.replies.send(GOODBYE, "Goodbye.");
    CommandStatus::CloseConnection
}

fn handle_cmd_cdup<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    let parent = parent_path(ctx.session.cwd());
    ctx.session.set_cwd(parent);
    ctx.replies.send(FILE_ACTION_OK, "Directory successfully changed.");
    CommandStatus::Success
}

/// Handles CWD. `.` and `..` are rewritten to PWD and CDUP and dispatched
/// again on the next poll.
fn handle_cmd_cwd<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    command: &mut Command,
    path: String,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    match command.params.as_str() {
        "." => {
            command.rewrite(FtpCommand::Pwd);
            return CommandStatus::Reinvoke;
        }
        ".." => {
            command.rewrite(FtpCommand::Cdup);
            return CommandStatus::Reinvoke;
        }
        _ => {}
    }

    match ctx.fs.metadata(&path) {
        Ok(meta) if meta.is_dir => {
            debug!("Changing directory to {}", path);
            ctx.session.set_cwd(path);
            ctx.replies.send(FILE_ACTION_OK, "Directory successfully changed.");
            CommandStatus::Success
        }
        _ => {
            ctx.replies.send(FILE_NOT_FOUND, "Failed to change directory.");
            CommandStatus::Failure(format!("no directory {}", path))
        }
    }
}

fn handle_cmd_mode<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>, mode: &str) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    if mode.eq_ignore_ascii_case("S") {
        ctx.replies.send(OK, "Mode set to S.");
        CommandStatus::Success
    } else {
        ctx.replies.send(PARAMETER_NOT_IMPLEMENTED, "Only S(tream) mode is supported");
        CommandStatus::Failure(format!("mode {}", mode))
    }
}

fn handle_cmd_stru<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>, structure: &str) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    if structure.eq_ignore_ascii_case("F") {
        ctx.replies.send(OK, "Structure set to F.");
        CommandStatus::Success
    } else {
        ctx.replies.send(PARAMETER_NOT_IMPLEMENTED, "Only F(ile) is supported");
        CommandStatus::Failure(format!("structure {}", structure))
    }
}

/// Handles TYPE. Both types are transferred byte for byte.
fn handle_cmd_type<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>, kind: &str) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    let first = kind.split_whitespace().next().unwrap_or("").to_ascii_uppercase();
    match first.as_str() {
        "A" => ctx.replies.send(OK, "TYPE is now ASCII."),
        "I" => ctx.replies.send(OK, "TYPE is now 8-bit Binary."),
        _ => {
            ctx.replies.send(PARAMETER_NOT_IMPLEMENTED, "Unrecognised TYPE.");
            return CommandStatus::Failure(format!("type {}", kind));
        }
    }
    CommandStatus::Success
}

/// Handles PASV: drops any data connection and reports where to connect.
fn handle_cmd_pasv<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    abort_transfer(ctx.transfer, ctx.data, ctx.replies);
    ctx.data.enter_passive();

    let ip = ctx
        .settings
        .passive_address
        .or(ctx.local_ip)
        .unwrap_or(Ipv4Addr::UNSPECIFIED);
    let port = ctx.data.passive_port();
    info!("Passive mode on {}:{}", ip, port);
    let reply = format!("Entering Passive Mode ({}).", format_pasv_address(ip, port));
    ctx.replies.send(PASSIVE_MODE, &reply);
    CommandStatus::Success
}

/// Handles PORT. A malformed argument leaves the data mode untouched.
fn handle_cmd_port<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>, param: &str) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    abort_transfer(ctx.transfer, ctx.data, ctx.replies);
    ctx.data.close();

    match parse_port_argument(param) {
        Some(endpoint) => {
            ctx.data.enter_active(endpoint);
            ctx.replies.send(OK, "PORT command successful");
            CommandStatus::Success
        }
        None => {
            ctx.replies.send(BAD_PARAMETERS, "Can't interpret parameters");
            CommandStatus::Failure(format!("bad PORT argument '{}'", param))
        }
    }
}

fn handle_cmd_dele<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    params: &str,
    path: &str,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    if let Some(status) = missing_file_name(ctx.replies, params) {
        return status;
    }
    if !ctx.fs.exists(path) {
        let reply = format!("Delete operation failed, file '{}' not found.", path);
        ctx.replies.send(FILE_NOT_FOUND, &reply);
        return CommandStatus::Failure(reply);
    }
    match ctx.fs.remove(path) {
        Ok(()) => {
            ctx.replies.send(FILE_ACTION_OK, "Delete operation successful.");
            CommandStatus::Success
        }
        Err(e) => {
            let code = storage_error_code("DELE", &e);
            ctx.replies.send(code, "Delete operation failed.");
            CommandStatus::Failure(e.to_string())
        }
    }
}

/// Polls the data channel for a transfer command. `None` means the data
/// connection is up and the handler may go on.
fn await_data_connection<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>) -> Option<CommandStatus>
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    match ctx.data.ready() {
        DataReady::Ready => None,
        DataReady::NotReady => Some(CommandStatus::Reinvoke),
        DataReady::Failed => {
            ctx.replies.send(NO_DATA_CONNECTION, "No data connection");
            Some(CommandStatus::Failure("no data connection".into()))
        }
    }
}

/// Allocates the transfer buffer or answers 451 and drops the data
/// connection.
fn allocate_buffer<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    preferred: usize,
) -> Option<TransferBuffer>
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    let buffer = TransferBuffer::allocate_within(
        preferred,
        ctx.settings.max_buffer_size,
        ctx.settings.buffer_budget,
    );
    if buffer.is_none() {
        ctx.data.close();
        ctx.replies.send(LOCAL_ERROR, "Internal error. Not enough memory.");
    }
    buffer
}

/// Handles LIST, MLSD and NLST. The listing is rendered once the data
/// connection is up and streamed by the transfer loop.
fn handle_cmd_listing<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    command: &Command,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    let Some(format) = ListingFormat::for_command(command.code) else {
        return CommandStatus::Failure("not a listing command".into());
    };

    if ctx.transfer.is_some() {
        abort_transfer(ctx.transfer, ctx.data, ctx.replies);
    }
    if let Some(status) = await_data_connection(ctx) {
        return status;
    }
    ctx.replies.send(OPENING_DATA, "Accepted data connection");

    // Some clients send `ls` style options such as `-la`.
    let target = command
        .params
        .split_whitespace()
        .filter(|token| !token.starts_with('-'))
        .collect::<Vec<_>>()
        .join(" ");
    let path = resolve_path(ctx.session.cwd(), &target, true);
    debug!("Listing content of {}", path);

    let entries = match ctx.fs.read_dir(&path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("{} failed: {}", command.token, e);
            ctx.data.close();
            ctx.replies.send(FILE_NOT_FOUND, &format!("Can't open directory {}", path));
            return CommandStatus::Failure(e.to_string());
        }
    };

    let body = render_listing(&entries, format);
    let preferred = body.len().min(ctx.settings.retrieve_buffer_size);
    let Some(buffer) = allocate_buffer(ctx, preferred) else {
        return CommandStatus::Failure("out of memory".into());
    };
    *ctx.transfer = Some(TransferContext::listing(
        body,
        entries.len(),
        format,
        buffer,
        ctx.now,
    ));
    CommandStatus::Success
}

fn handle_cmd_retr<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    params: &str,
    path: &str,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    if let Some(status) = missing_file_name(ctx.replies, params) {
        return status;
    }
    match ctx.fs.metadata(path) {
        Err(_) => {
            let reply = format!("File '{}' not found.", params);
            ctx.replies.send(FILE_NOT_FOUND, &reply);
            return CommandStatus::Failure(reply);
        }
        Ok(meta) if meta.is_dir => {
            let reply = format!("Cannot open file \"{}\".", params);
            ctx.replies.send(FILE_UNAVAILABLE, &reply);
            return CommandStatus::Failure(reply);
        }
        Ok(_) => {}
    }

    if ctx.transfer.is_some() {
        abort_transfer(ctx.transfer, ctx.data, ctx.replies);
    }
    if let Some(status) = await_data_connection(ctx) {
        return status;
    }

    let file = match ctx.fs.open_read(path) {
        Ok(file) => file,
        Err(e) => {
            let code = storage_error_code("RETR", &e);
            ctx.data.close();
            ctx.replies.send(code, &format!("Cannot open file \"{}\".", params));
            return CommandStatus::Failure(e.to_string());
        }
    };
    let size = file.size();
    let preferred = usize::try_from(size)
        .unwrap_or(usize::MAX)
        .min(ctx.settings.retrieve_buffer_size);
    let Some(buffer) = allocate_buffer(ctx, preferred) else {
        return CommandStatus::Failure("out of memory".into());
    };

    info!(
        "Sending file '{}' ({} bytes)",
        file_name(ctx.session.cwd(), params, false),
        size
    );
    ctx.replies.send(OPENING_DATA, &format!("{} bytes to download", size));
    *ctx.transfer = Some(TransferContext::retrieve(file, buffer, ctx.now));
    CommandStatus::Success
}

fn handle_cmd_stor<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    params: &str,
    path: &str,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    if let Some(status) = missing_file_name(ctx.replies, params) {
        return status;
    }
    let cannot_create = format!("Cannot open/create \"{}\"", path);
    let parent = resolve_path(path, "", false);
    let parent_is_dir = ctx.fs.metadata(&parent).is_ok_and(|meta| meta.is_dir);
    let target_is_dir = ctx.fs.metadata(path).is_ok_and(|meta| meta.is_dir);
    if !parent_is_dir || target_is_dir {
        ctx.replies.send(LOCAL_ERROR, &cannot_create);
        return CommandStatus::Failure(cannot_create);
    }

    if ctx.transfer.is_some() {
        abort_transfer(ctx.transfer, ctx.data, ctx.replies);
    }
    if let Some(status) = await_data_connection(ctx) {
        return status;
    }

    // Allocate before opening: opening truncates the target.
    let preferred = ctx.settings.store_buffer_size;
    let Some(buffer) = allocate_buffer(ctx, preferred) else {
        return CommandStatus::Failure("out of memory".into());
    };
    let file = match ctx.fs.open_write(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("STOR failed: {}", e);
            ctx.data.close();
            ctx.replies.send(LOCAL_ERROR, &cannot_create);
            return CommandStatus::Failure(e.to_string());
        }
    };

    info!("Receiving file '{}' => {}", params, path);
    let port = match ctx.data.mode() {
        DataMode::Active(endpoint) => endpoint.port(),
        DataMode::Passive => ctx.data.passive_port(),
    };
    ctx.replies.send(OPENING_DATA, &format!("Connected to port {}", port));
    *ctx.transfer = Some(TransferContext::store(file, buffer, ctx.now));
    CommandStatus::Success
}

fn handle_cmd_mkd<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>, path: &str) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    match ctx.fs.mkdir(path) {
        Ok(()) => {
            ctx.replies.send(PATH_CREATED, &format!("\"{}\" created.", path));
            CommandStatus::Success
        }
        Err(e) => {
            warn!("MKD {} failed: {}", path, e);
            ctx.replies.send(FILE_NOT_FOUND, "Create directory operation failed.");
            CommandStatus::Failure(e.to_string())
        }
    }
}

fn handle_cmd_rmd<L, C, F>(ctx: &mut DispatchContext<'_, L, C, F>, path: &str) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    match ctx.fs.rmdir(path) {
        Ok(()) => {
            ctx.replies.send(FILE_ACTION_OK, "Remove directory operation successful.");
            CommandStatus::Success
        }
        Err(StorageError::DirectoryNotEmpty(_)) => {
            ctx.replies.send(
                FILE_NOT_FOUND,
                "Remove directory operation failed, directory is not empty.",
            );
            CommandStatus::Failure(format!("{} not empty", path))
        }
        Err(e) => {
            warn!("RMD {} failed: {}", path, e);
            ctx.replies.send(FILE_NOT_FOUND, "Remove directory operation failed.");
            CommandStatus::Failure(e.to_string())
        }
    }
}

fn handle_cmd_rnfr<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    params: &str,
    path: String,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    if let Some(status) = missing_file_name(ctx.replies, params) {
        return status;
    }
    if !ctx.fs.exists(&path) {
        let reply = format!("File \"{}\" not found.", path);
        ctx.replies.send(FILE_NOT_FOUND, &reply);
        return CommandStatus::Failure(reply);
    }
    let reply = format!(
        "RNFR accepted - file \"{}\" exists, ready for destination",
        path
    );
    ctx.replies.send(PENDING_FURTHER_INFO, &reply);
    ctx.session.set_rename_from(path);
    CommandStatus::Success
}

/// Handles RNTO. The pending source was already cleared on entry.
fn handle_cmd_rnto<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    params: &str,
    path: &str,
    rename_from: Option<String>,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    let Some(from) = rename_from else {
        ctx.replies.send(BAD_SEQUENCE, "Need RNFR before RNTO");
        return CommandStatus::Failure("RNTO without RNFR".into());
    };
    if let Some(status) = missing_file_name(ctx.replies, params) {
        return status;
    }
    if ctx.fs.exists(path) {
        let reply = format!("\"{}\" already exists.", params);
        ctx.replies.send(FILE_EXISTS, &reply);
        return CommandStatus::Failure(reply);
    }

    debug!("Renaming '{}' to '{}'", from, path);
    match ctx.fs.rename(&from, path) {
        Ok(()) => {
            ctx.replies.send(FILE_ACTION_OK, "File successfully renamed or moved");
            CommandStatus::Success
        }
        Err(e) => {
            warn!("RNTO failed: {}", e);
            ctx.replies.send(LOCAL_ERROR, "Rename/move failure.");
            CommandStatus::Failure(e.to_string())
        }
    }
}

fn handle_cmd_mdtm<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    params: &str,
    path: &str,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    match ctx.fs.metadata(path) {
        Ok(meta) if !params.is_empty() && !meta.is_dir => {
            let modified = meta.modified.unwrap_or(SystemTime::UNIX_EPOCH);
            ctx.replies.send(FILE_STATUS, &format_timestamp(modified));
            CommandStatus::Success
        }
        _ => {
            ctx.replies.send(FILE_NOT_FOUND, "Unable to retrieve time");
            CommandStatus::Failure(format!("no time for {}", path))
        }
    }
}

fn handle_cmd_size<L, C, F>(
    ctx: &mut DispatchContext<'_, L, C, F>,
    params: &str,
    path: &str,
) -> CommandStatus
where
    L: Listener,
    C: Connector<Conn = L::Conn>,
    F: FileSystem,
{
    match ctx.fs.metadata(path) {
        Ok(meta) if !params.is_empty() && !meta.is_dir => {
            ctx.replies.send(FILE_STATUS, &meta.size.to_string());
            CommandStatus::Success
        }
        _ => {
            ctx.replies.send(FILE_UNAVAILABLE, "Cannot open file.");
            CommandStatus::Failure(format!("no size for {}", path))
        }
    }
}
