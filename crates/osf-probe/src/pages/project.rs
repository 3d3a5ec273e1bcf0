//! Project settings and the delete-node confirmation dialog.

use crate::locator::Selector;
use crate::page_object::{component, elements, page, Page};

page! {
    /// Node settings, reached from a project or component URL
    NodeSettingsPage
}

impl NodeSettingsPage {
    elements! {
        delete_node_button: Selector::xpath("//*[@id='deleteNode']");
    }

    /// Confirmation dialog opened by the delete button
    #[must_use]
    pub fn delete_dialog(&self) -> DeleteNodeDialog {
        DeleteNodeDialog::new(&self.session)
    }
}

impl Page for NodeSettingsPage {
    const IDENTITY: Selector = Selector::xpath("//*[@id='deleteNode']");
}

component! {
    /// Bootbox dialog asking the user to retype a confirmation word
    DeleteNodeDialog
}

impl DeleteNodeDialog {
    elements! {
        /// Word the user must type, changes every time
        confirm_word: Selector::xpath("/html/body/div[6]/div/div/div[2]/div/p[2]/strong");
        confirm_input: Selector::id("bbConfirmText");
        confirm_button: Selector::xpath("/html/body/div[6]/div/div/div[3]/button[2]");
    }
}
