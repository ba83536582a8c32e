//! A small content site shared by the integration tests

use navtree::services::fetch::StaticBackend;

pub const PAGE_URL: &str = "http://site/docs/guide/";
pub const BRANCH_URL: &str = "http://site/docs/guide/@@singleBranchTree.xml";

/// Branch from the site root down to the selected `guide` folder
pub const BRANCH: &str = r#"<?xml version="1.0" ?>
<children title_tpl="Contains $${num} item(s)" loading_msg="Loading...">
  <collection name="[top]" baseURL="http://site/" length="3" icon_url="http://site/@@/folder.gif" isroot="">
    <collection name="docs" length="2" icon_url="http://site/@@/folder.gif">
      <collection name="guide" length="0" icon_url="http://site/@@/folder.gif">selected</collection>
      <collection name="api" length="2" icon_url="http://site/@@/folder.gif"/>
    </collection>
    <collection name="news" length="3" icon_url="http://site/@@/folder.gif"/>
    <collection name="empty" length="0" icon_url="http://site/@@/folder.gif"/>
  </collection>
</children>"#;

pub const API_URL: &str = "http://site/docs/api/@@children.xml";
pub const API_CHILDREN: &str = r#"<children>
  <collection name="v1" length="1" icon_url=""/>
  <item name="index.html" icon_url=""/>
  <collection name="v2" length="0" icon_url=""/>
</children>"#;

pub const NEWS_URL: &str = "http://site/news/@@children.xml";
pub const NEWS_CHILDREN: &str = r#"<children>
  <collection name="2024" length="4" icon_url=""/>
  <collection name="2025" length="7" icon_url=""/>
  <collection name="archive" length="0" icon_url=""/>
</children>"#;

pub const V1_URL: &str = "http://site/docs/api/v1/@@children.xml";
pub const V1_CHILDREN: &str = r#"<children>
  <collection name="legacy" length="0" icon_url=""/>
</children>"#;

/// The whole site served from memory
pub fn backend() -> StaticBackend {
    StaticBackend::new()
        .with_document(BRANCH_URL, BRANCH)
        .with_document(API_URL, API_CHILDREN)
        .with_document(NEWS_URL, NEWS_CHILDREN)
        .with_document(V1_URL, V1_CHILDREN)
}
