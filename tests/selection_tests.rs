//! 选中文本获取测试: 无障碍树读取、剪贴板复制回退与恢复

use hotkey_translator::application::selection::{
    AccessibilityReader, ClipboardReader, PollPolicy, SelectionAcquirer, NODE_BUDGET,
};
use hotkey_translator::domain::error::AppError;
use hotkey_translator::domain::selection::{
    AxAttribute, AxValue, ClipboardItem, ClipboardSnapshot, Representation, TextRange,
};
use hotkey_translator::domain::traits::{AccessibilityTree, ClipboardPort, CopyShortcut};
use hotkey_translator::infrastructure::platform::accessibility::UnsupportedAccessibility;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// accessibility tree fake

#[derive(Default, Clone)]
struct FakeNode {
    selected: Option<String>,
    value: Option<String>,
    range: Option<TextRange>,
    attributed: Option<String>,
    children: Vec<usize>,
}

#[derive(Default)]
struct FakeTree {
    nodes: HashMap<usize, FakeNode>,
    focused: Option<usize>,
    window: Option<usize>,
    visits: RefCell<Vec<usize>>,
}

impl FakeTree {
    fn node(mut self, id: usize, node: FakeNode) -> Self {
        self.nodes.insert(id, node);
        self
    }

    fn focus(mut self, focused: Option<usize>, window: Option<usize>) -> Self {
        self.focused = focused;
        self.window = window;
        self
    }

    fn visits(&self) -> usize {
        self.visits.borrow().len()
    }
}

impl AccessibilityTree for FakeTree {
    type Node = usize;

    fn focused_element(&self) -> Option<usize> {
        self.focused
    }

    fn focused_window(&self) -> Option<usize> {
        self.window
    }

    fn children(&self, node: &usize) -> Vec<usize> {
        self.nodes.get(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn attribute(&self, node: &usize, key: AxAttribute) -> Option<AxValue> {
        let n = self.nodes.get(node)?;
        match key {
            AxAttribute::SelectedText => {
                self.visits.borrow_mut().push(*node);
                n.selected.clone().map(AxValue::Text)
            }
            AxAttribute::Value => n.value.clone().map(AxValue::Text),
            AxAttribute::SelectedTextRange => n.range.map(AxValue::Range),
        }
    }

    fn string_for_range(&self, node: &usize, _range: TextRange) -> Option<String> {
        self.nodes.get(node)?.attributed.clone()
    }
}

fn selected(text: &str) -> FakeNode {
    FakeNode {
        selected: Some(text.to_string()),
        ..Default::default()
    }
}

fn parent(children: &[usize]) -> FakeNode {
    FakeNode {
        children: children.to_vec(),
        ..Default::default()
    }
}

fn ranged(value: &str, location: i64, length: i64) -> FakeNode {
    FakeNode {
        selected: Some("   ".to_string()),
        value: Some(value.to_string()),
        range: Some(TextRange::new(location, length)),
        attributed: Some("from attributed string".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_focused_selected_text_is_trimmed() {
    let tree = FakeTree::default()
        .node(0, selected("  hello \n"))
        .focus(Some(0), None);
    assert_eq!(AccessibilityReader::new(tree).read().as_deref(), Some("hello"));
}

#[test]
fn test_value_narrowed_by_range() {
    let tree = FakeTree::default()
        .node(0, ranged("Hello world", 6, 5))
        .focus(Some(0), None);
    assert_eq!(AccessibilityReader::new(tree).read().as_deref(), Some("world"));
}

#[test]
fn test_range_counts_utf16_units() {
    // the emoji is two UTF-16 units
    let tree = FakeTree::default()
        .node(0, ranged("😀 abc", 3, 3))
        .focus(Some(0), None);
    assert_eq!(AccessibilityReader::new(tree).read().as_deref(), Some("abc"));
}

#[test]
fn test_overrunning_range_is_clamped() {
    let tree = FakeTree::default()
        .node(0, ranged("Hello world", 6, 100))
        .focus(Some(0), None);
    assert_eq!(AccessibilityReader::new(tree).read().as_deref(), Some("world"));
}

#[test]
fn test_range_past_end_falls_back_to_attributed_string() {
    let tree = FakeTree::default()
        .node(0, ranged("Hello", 20, 2))
        .focus(Some(0), None);
    assert_eq!(
        AccessibilityReader::new(tree).read().as_deref(),
        Some("from attributed string")
    );
}

#[test]
fn test_unresolved_range_yields_nothing() {
    let tree = FakeTree::default()
        .node(0, ranged("Hello", -1, 0))
        .focus(Some(0), None);
    assert_eq!(AccessibilityReader::new(tree).read(), None);
}

#[test]
fn test_range_slicing_guards() {
    assert_eq!(TextRange::new(-1, 3).slice("abc"), None);
    assert_eq!(TextRange::new(0, 0).slice("abc"), None);
    assert_eq!(TextRange::new(4, 1).slice("abc"), None);
    assert_eq!(TextRange::new(3, 1).slice("abc").as_deref(), Some(""));
    assert_eq!(TextRange::new(1, 1).slice("abc").as_deref(), Some("b"));
}

#[test]
fn test_search_is_breadth_first() {
    let tree = FakeTree::default()
        .node(0, parent(&[1, 2]))
        .node(1, parent(&[3]))
        .node(2, selected("shallow"))
        .node(3, selected("deep"))
        .focus(Some(0), None);
    assert_eq!(AccessibilityReader::new(tree).read().as_deref(), Some("shallow"));
}

#[test]
fn test_window_search_after_focus_fails() {
    let tree = FakeTree::default()
        .node(0, FakeNode::default())
        .node(10, parent(&[11]))
        .node(11, selected("in window"))
        .focus(Some(0), Some(10));
    assert_eq!(AccessibilityReader::new(tree).read().as_deref(), Some("in window"));
}

#[test]
fn test_no_focus_no_window() {
    let reader = AccessibilityReader::new(FakeTree::default());
    assert_eq!(reader.read(), None);
}

#[test]
fn test_cyclic_tree_respects_budget() {
    let tree = FakeTree::default()
        .node(0, parent(&[0, 1]))
        .node(1, parent(&[0, 1]))
        .focus(None, Some(0));
    let reader = AccessibilityReader::new(tree);

    assert_eq!(reader.read(), None);
    assert_eq!(reader.tree().visits(), NODE_BUDGET);
}

#[test]
fn test_custom_budget() {
    let wide: Vec<usize> = (1..=100).collect();
    let tree = FakeTree::default().node(0, parent(&wide)).focus(None, Some(0));
    let reader = AccessibilityReader::with_budget(tree, 5);

    assert_eq!(reader.read(), None);
    assert_eq!(reader.tree().visits(), 5);
}

// ---------------------------------------------------------------------------
// clipboard fakes

#[derive(Default)]
struct Board {
    items: Vec<ClipboardItem>,
    count: u64,
    /// Copy result that lands after this many counter reads.
    pending: Option<(u32, String)>,
    polls: u32,
    captures: u32,
    restores: u32,
    fail_capture: bool,
    /// Restored content disappears when the process exits.
    transient: bool,
    /// Threads the capture, counter and shortcut calls ran on.
    threads: Vec<std::thread::ThreadId>,
}

fn text_item(text: &str) -> ClipboardItem {
    ClipboardItem {
        representations: vec![Representation {
            format: "text/plain".to_string(),
            bytes: text.as_bytes().to_vec(),
        }],
    }
}

#[derive(Clone, Default)]
struct FakeClipboard(Arc<Mutex<Board>>);

impl FakeClipboard {
    fn with_items(items: Vec<ClipboardItem>) -> Self {
        let board = Board {
            items,
            count: 41,
            ..Default::default()
        };
        Self(Arc::new(Mutex::new(board)))
    }

    fn board(&self) -> std::sync::MutexGuard<'_, Board> {
        self.0.lock().unwrap()
    }
}

impl ClipboardPort for FakeClipboard {
    fn change_count(&self) -> Result<u64, AppError> {
        let mut board = self.board();
        board.polls += 1;
        board.threads.push(std::thread::current().id());
        if let Some((remaining, text)) = board.pending.take() {
            if remaining <= 1 {
                board.items = vec![text_item(&text)];
                board.count += 1;
            } else {
                board.pending = Some((remaining - 1, text));
            }
        }
        Ok(board.count)
    }

    fn read_text(&self) -> Result<Option<String>, AppError> {
        let board = self.board();
        Ok(board
            .items
            .iter()
            .flat_map(|i| i.representations.iter())
            .find(|r| r.format == "text/plain")
            .map(|r| String::from_utf8_lossy(&r.bytes).into_owned()))
    }

    fn capture(&self) -> Result<ClipboardSnapshot, AppError> {
        let mut board = self.board();
        if board.fail_capture {
            return Err(AppError::Clipboard("pasteboard unavailable".to_string()));
        }
        board.captures += 1;
        board.threads.push(std::thread::current().id());
        Ok(ClipboardSnapshot {
            items: board.items.clone(),
            change_count: board.count,
        })
    }

    fn restore(&self, snapshot: &ClipboardSnapshot) -> Result<(), AppError> {
        let mut board = self.board();
        board.restores += 1;
        board.items = snapshot.items.clone();
        board.count += 1;
        Ok(())
    }

    fn restore_survives_exit(&self) -> bool {
        !self.board().transient
    }
}

struct FakeCopy {
    board: FakeClipboard,
    result: Option<(u32, String)>,
    fail: bool,
}

impl CopyShortcut for FakeCopy {
    fn send_copy(&self) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Input("input monitoring denied".to_string()));
        }
        let mut board = self.board.board();
        board.threads.push(std::thread::current().id());
        board.pending = self.result.clone();
        Ok(())
    }
}

fn user_items() -> Vec<ClipboardItem> {
    vec![
        ClipboardItem {
            representations: vec![
                Representation {
                    format: "text/plain".to_string(),
                    bytes: b"user text".to_vec(),
                },
                Representation {
                    format: "text/html".to_string(),
                    bytes: b"<b>user text</b>".to_vec(),
                },
            ],
        },
        ClipboardItem {
            representations: vec![Representation {
                format: "image/png".to_string(),
                bytes: vec![0x89, b'P', b'N', b'G', 0, 1, 2],
            }],
        },
    ]
}

fn reader(
    clipboard: &FakeClipboard,
    result: Option<(u32, &str)>,
) -> ClipboardReader<FakeClipboard, FakeCopy> {
    let copy = FakeCopy {
        board: clipboard.clone(),
        result: result.map(|(n, t)| (n, t.to_string())),
        fail: false,
    };
    ClipboardReader::new(clipboard.clone(), copy)
}

#[test]
fn test_default_poll_policy() {
    let policy = PollPolicy::default();
    assert_eq!(policy.attempts, 8);
    assert_eq!(policy.interval, Duration::from_millis(200));
    assert_eq!(policy.budget(), Duration::from_millis(1600));
}

#[tokio::test(start_paused = true)]
async fn test_copied_text_is_returned_and_clipboard_restored() {
    let clipboard = FakeClipboard::with_items(user_items());
    let reader = reader(&clipboard, Some((3, "selected words")));
    let start = tokio::time::Instant::now();

    let text = reader.read(&CancellationToken::new()).await;

    assert_eq!(text.as_deref(), Some("selected words"));
    assert_eq!(start.elapsed(), Duration::from_millis(600));
    let board = clipboard.board();
    assert_eq!(board.polls, 3);
    assert_eq!(board.restores, 1);
    assert_eq!(board.items, user_items());
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_clipboard_gives_up_after_budget() {
    let clipboard = FakeClipboard::with_items(user_items());
    let reader = reader(&clipboard, None);
    let start = tokio::time::Instant::now();

    let text = reader.read(&CancellationToken::new()).await;

    assert_eq!(text, None);
    assert_eq!(start.elapsed(), Duration::from_millis(1600));
    let board = clipboard.board();
    assert_eq!(board.polls, 8);
    assert_eq!(board.restores, 1);
    assert_eq!(board.items, user_items());
}

#[tokio::test(start_paused = true)]
async fn test_change_without_text_is_not_accepted() {
    let clipboard = FakeClipboard::with_items(user_items());
    let reader = reader(&clipboard, Some((1, "  ")));

    assert_eq!(reader.read(&CancellationToken::new()).await, None);
    assert_eq!(clipboard.board().polls, 8);
}

#[tokio::test(start_paused = true)]
async fn test_same_text_without_counter_change_is_ignored() {
    // old text is still there but the counter never moved
    let clipboard = FakeClipboard::with_items(vec![text_item("stale")]);
    let reader = reader(&clipboard, None);

    assert_eq!(reader.read(&CancellationToken::new()).await, None);
}

#[tokio::test(start_paused = true)]
async fn test_empty_clipboard_is_restored_empty() {
    let clipboard = FakeClipboard::with_items(Vec::new());
    let reader = reader(&clipboard, Some((1, "copied")));

    assert_eq!(
        reader.read(&CancellationToken::new()).await.as_deref(),
        Some("copied")
    );
    let board = clipboard.board();
    assert!(board.items.is_empty());
    assert_eq!(board.restores, 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_polling_and_restores() {
    let clipboard = FakeClipboard::with_items(user_items());
    let reader = reader(&clipboard, Some((5, "late")));
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(reader.read(&cancel).await, None);
    let board = clipboard.board();
    assert_eq!(board.polls, 0);
    assert_eq!(board.restores, 1);
    assert_eq!(board.items, user_items());
}

#[tokio::test(start_paused = true)]
async fn test_dropped_read_still_restores() {
    let clipboard = FakeClipboard::with_items(user_items());
    let reader = reader(&clipboard, None);

    let timed_out = tokio::time::timeout(
        Duration::from_millis(300),
        reader.read(&CancellationToken::new()),
    )
    .await;

    assert!(timed_out.is_err());
    let board = clipboard.board();
    assert_eq!(board.restores, 1);
    assert_eq!(board.items, user_items());
}

#[tokio::test(start_paused = true)]
async fn test_failed_snapshot_skips_copy() {
    let clipboard = FakeClipboard::with_items(user_items());
    clipboard.board().fail_capture = true;
    let reader = reader(&clipboard, Some((1, "never")));

    assert_eq!(reader.read(&CancellationToken::new()).await, None);
    let board = clipboard.board();
    assert_eq!(board.polls, 0);
    assert_eq!(board.restores, 0);
    assert!(board.pending.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_failed_shortcut_restores() {
    let clipboard = FakeClipboard::with_items(user_items());
    let copy = FakeCopy {
        board: clipboard.clone(),
        result: None,
        fail: true,
    };
    let reader = ClipboardReader::new(clipboard.clone(), copy);

    assert_eq!(reader.read(&CancellationToken::new()).await, None);
    assert_eq!(clipboard.board().restores, 1);
}

#[tokio::test(start_paused = true)]
async fn test_transient_clipboard_with_content_skips_copy() {
    let clipboard = FakeClipboard::with_items(user_items());
    clipboard.board().transient = true;
    let reader = reader(&clipboard, Some((1, "never")));

    assert_eq!(reader.read(&CancellationToken::new()).await, None);
    let board = clipboard.board();
    assert!(board.pending.is_none());
    assert_eq!(board.polls, 0);
    assert_eq!(board.restores, 0);
    assert_eq!(board.items, user_items());
}

#[tokio::test(start_paused = true)]
async fn test_transient_empty_clipboard_still_copies() {
    // an empty clipboard is what we leave behind, owner or not
    let clipboard = FakeClipboard::with_items(Vec::new());
    clipboard.board().transient = true;
    let reader = reader(&clipboard, Some((1, "copied")));

    assert_eq!(
        reader.read(&CancellationToken::new()).await.as_deref(),
        Some("copied")
    );
    let board = clipboard.board();
    assert!(board.items.is_empty());
    assert_eq!(board.restores, 1);
}

#[tokio::test(start_paused = true)]
async fn test_platform_calls_leave_the_runtime_thread() {
    let clipboard = FakeClipboard::with_items(user_items());
    let reader = reader(&clipboard, Some((2, "selected words")));
    let runtime_thread = std::thread::current().id();

    assert_eq!(
        reader.read(&CancellationToken::new()).await.as_deref(),
        Some("selected words")
    );
    let board = clipboard.board();
    // capture, shortcut and two counter reads
    assert_eq!(board.threads.len(), 4);
    assert!(board.threads.iter().all(|id| *id != runtime_thread));
}

// ---------------------------------------------------------------------------
// facade

#[tokio::test(start_paused = true)]
async fn test_accessibility_wins_without_touching_clipboard() {
    let clipboard = FakeClipboard::with_items(user_items());
    let tree = FakeTree::default()
        .node(0, selected("from tree"))
        .focus(Some(0), None);
    let acquirer = SelectionAcquirer::new(
        AccessibilityReader::new(tree),
        reader(&clipboard, Some((1, "from clipboard"))),
    );

    let text = acquirer.acquire(&CancellationToken::new()).await;

    assert_eq!(text.as_deref(), Some("from tree"));
    let board = clipboard.board();
    assert_eq!(board.captures, 0);
    assert_eq!(board.restores, 0);
}

#[tokio::test(start_paused = true)]
async fn test_clipboard_used_when_tree_is_empty() {
    let clipboard = FakeClipboard::with_items(user_items());
    let tree = FakeTree::default()
        .node(0, selected("   "))
        .focus(Some(0), None);
    let acquirer = SelectionAcquirer::new(
        AccessibilityReader::new(tree),
        reader(&clipboard, Some((2, "from clipboard"))),
    );

    let text = acquirer.acquire(&CancellationToken::new()).await;

    assert_eq!(text.as_deref(), Some("from clipboard"));
    assert_eq!(clipboard.board().items, user_items());
}

#[tokio::test(start_paused = true)]
async fn test_nothing_anywhere() {
    let clipboard = FakeClipboard::with_items(user_items());
    let acquirer = SelectionAcquirer::new(
        AccessibilityReader::new(UnsupportedAccessibility::new()),
        reader(&clipboard, None),
    );

    assert_eq!(acquirer.acquire(&CancellationToken::new()).await, None);
    assert_eq!(clipboard.board().restores, 1);
}
