//! End-to-end loading and merging of real layer directories

use rime_tree_core::{
    ConfigNode, FileKind, Layer, NodeKind, RimeConfigurationTree, RimeTreeConfig, RimeTreeError,
    ScalarValue,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

async fn built_fixture_tree() -> RimeConfigurationTree {
    let config = RimeTreeConfig::with_dirs(fixtures().join("shared"), fixtures().join("user"));
    let mut tree = RimeConfigurationTree::new(&config).unwrap();
    tree.build().await.unwrap();
    tree
}

fn value<'a>(tree: &'a RimeConfigurationTree, layer: Layer, path: &str) -> Option<&'a ScalarValue> {
    tree.find(layer, path).and_then(ConfigNode::value)
}

fn keys(node: &ConfigNode) -> Vec<&str> {
    node.children().keys().map(String::as_str).collect()
}

#[tokio::test]
async fn test_merged_tree_documents() {
    let tree = built_fixture_tree().await;
    let merged = tree.merged_tree().unwrap();

    assert_eq!(merged.kind(), NodeKind::Folder);
    assert_eq!(merged.source_path(), Some(fixtures().join("shared").as_path()));
    // broken.yaml is dropped, the dictionary and README are never loaded,
    // user.yaml is adopted, custom documents are not.
    assert_eq!(keys(merged), vec!["default", "luna_pinyin.schema", "user"]);
    assert!(
        merged
            .children()
            .values()
            .all(|file| file.kind() == NodeKind::File
                && file.file_kind() == Some(FileKind::Default))
    );
}

#[tokio::test]
async fn test_patch_overrides_and_keeps_untouched_values() {
    let tree = built_fixture_tree().await;

    assert_eq!(
        value(&tree, Layer::Merged, "default/menu/page_size"),
        Some(&ScalarValue::Integer(9))
    );
    assert_eq!(
        value(&tree, Layer::Merged, "default/switcher/caption"),
        Some(&ScalarValue::from("〔方案選單〕"))
    );
    assert_eq!(
        value(&tree, Layer::Merged, "default/config_version"),
        Some(&ScalarValue::from("0.40"))
    );
    assert_eq!(
        value(&tree, Layer::Merged, "luna_pinyin.schema/schema/name"),
        Some(&ScalarValue::from("月"))
    );
    assert_eq!(
        value(&tree, Layer::Merged, "luna_pinyin.schema/schema/schema_id"),
        Some(&ScalarValue::from("luna_pinyin"))
    );
    assert_eq!(
        value(&tree, Layer::Merged, "luna_pinyin.schema/translator/dictionary"),
        Some(&ScalarValue::from("luna_pinyin.extended"))
    );
    assert_eq!(
        value(&tree, Layer::Merged, "luna_pinyin.schema/translator/enable_user_dict"),
        Some(&ScalarValue::Bool(true))
    );

    let page_size = tree.find(Layer::Merged, "default/menu/page_size").unwrap();
    assert_eq!(
        page_size.source_path(),
        Some(fixtures().join("user/default.custom.yaml").as_path())
    );

    // Only the patch entry is applied
    assert!(tree.find(Layer::Merged, "default/customization").is_none());
    assert!(tree.find(Layer::Merged, "default/patch").is_none());
}

#[tokio::test]
async fn test_sequences_merge_by_position() {
    let tree = built_fixture_tree().await;

    let hotkeys = tree.find(Layer::Merged, "default/switcher/hotkeys").unwrap();
    assert_eq!(keys(hotkeys), vec!["0", "1"]);
    assert_eq!(hotkeys.child("0").unwrap().label(), "- F8");
    assert_eq!(hotkeys.child("1").unwrap().label(), "- F4");

    assert_eq!(
        value(&tree, Layer::Merged, "default/schema_list/0/schema"),
        Some(&ScalarValue::from("terra_pinyin"))
    );
    assert_eq!(
        value(&tree, Layer::Merged, "default/schema_list/1/schema"),
        Some(&ScalarValue::from("cangjie5"))
    );
}

#[tokio::test]
async fn test_user_tree_is_left_as_loaded() {
    let tree = built_fixture_tree().await;
    let user = tree.user_tree().unwrap();

    assert_eq!(
        keys(user),
        vec![
            "default.custom",
            "luna_pinyin.schema.custom",
            "orphan.custom",
            "user"
        ]
    );
    assert_eq!(
        user.child("default.custom").unwrap().file_kind(),
        Some(FileKind::Custom)
    );

    let patch = tree.find(Layer::User, "default.custom/patch").unwrap();
    assert_eq!(patch.kind(), NodeKind::PatchContainer);
    assert_eq!(
        value(&tree, Layer::User, "default.custom/patch/menu/page_size"),
        Some(&ScalarValue::Integer(9))
    );
    assert_eq!(
        value(&tree, Layer::User, "user/var/last_build_time"),
        Some(&ScalarValue::Integer(1_700_000_000))
    );
}

#[tokio::test]
async fn test_root_holds_both_layers() {
    let tree = built_fixture_tree().await;
    let root = tree.root().unwrap();

    assert_eq!(root.kind(), NodeKind::Root);
    assert_eq!(keys(root), vec!["Default", "User"]);
    assert!(std::ptr::eq(
        tree.default_tree().unwrap(),
        tree.layer(Layer::Merged).unwrap()
    ));

    let depths: Vec<usize> = root.iter().take(3).map(|(depth, _)| depth).collect();
    assert_eq!(depths, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_merged_document_converts_back_to_yaml() {
    let tree = built_fixture_tree().await;
    let default = tree.find(Layer::Merged, "default").unwrap();

    let yaml = serde_yaml::to_string(&default.to_value()).unwrap();
    assert!(yaml.contains("page_size: 9"));
    assert!(yaml.contains("- F8"));
    assert!(yaml.contains("- F4"));
}

#[tokio::test]
async fn test_rebuild_picks_up_changes() {
    let temp_dir = TempDir::new().unwrap();
    let shared = temp_dir.path().join("shared");
    let user = temp_dir.path().join("user");
    fs::create_dir_all(&shared).unwrap();
    fs::create_dir_all(&user).unwrap();
    fs::write(shared.join("default.yaml"), "menu:\n  page_size: 5\n").unwrap();

    let mut tree = RimeConfigurationTree::new(&RimeTreeConfig::with_dirs(&shared, &user)).unwrap();
    tree.build().await.unwrap();
    assert_eq!(
        value(&tree, Layer::Merged, "default/menu/page_size"),
        Some(&ScalarValue::Integer(5))
    );

    fs::write(
        user.join("default.custom.yaml"),
        "patch:\n  menu/page_size: 7\n",
    )
    .unwrap();
    tree.build().await.unwrap();
    assert_eq!(
        value(&tree, Layer::Merged, "default/menu/page_size"),
        Some(&ScalarValue::Integer(7))
    );

    fs::remove_file(user.join("default.custom.yaml")).unwrap();
    tree.build().await.unwrap();
    assert_eq!(
        value(&tree, Layer::Merged, "default/menu/page_size"),
        Some(&ScalarValue::Integer(5))
    );
}

#[tokio::test]
async fn test_missing_user_directory_fails_build() {
    let temp_dir = TempDir::new().unwrap();
    let config = RimeTreeConfig::with_dirs(fixtures().join("shared"), temp_dir.path().join("none"));
    let mut tree = RimeConfigurationTree::new(&config).unwrap();

    let err = tree.build().await.unwrap_err();
    assert!(matches!(err, RimeTreeError::DirectoryRead { .. }));
    assert!(!tree.is_built());
    assert!(tree.merged_tree().is_none());
}

#[tokio::test]
async fn test_custom_labels() {
    let mut config = RimeTreeConfig::with_dirs(fixtures().join("shared"), fixtures().join("user"));
    if let Some(layers) = config.layers.as_mut() {
        layers.shared_label = Some("Shared".to_string());
        layers.user_label = Some("Mine".to_string());
    }

    let mut tree = RimeConfigurationTree::new(&config).unwrap();
    let root = tree.build().await.unwrap();
    assert_eq!(keys(root), vec!["Shared", "Mine"]);
    assert_eq!(tree.user_tree().unwrap().key(), "Mine");
}
